use std::collections::{BTreeMap, BTreeSet};
use std::process::Command;

use serde::Serialize;

/// Variable name to value. Ordered so composed output is deterministic.
pub type EnvMap = BTreeMap<String, String>;

/// Names whose inherited values must not reach the spawned process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockList {
    names: BTreeSet<String>,
}

impl BlockList {
    pub const fn new() -> Self {
        Self {
            names: BTreeSet::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for BlockList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for BlockList {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.names.extend(iter.into_iter().map(Into::into));
    }
}

/// The final environment handed to a spawned process.
///
/// Produced by [`compose`](super::compose); scoped to a single invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ComposedEnv {
    vars: EnvMap,
}

impl ComposedEnv {
    pub(super) fn from_map(vars: EnvMap) -> Self {
        Self { vars }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> EnvMap {
        self.vars
    }

    /// Replace the command's environment with exactly this mapping.
    ///
    /// Nothing from the parent process leaks through: the command's
    /// environment is cleared before the composed variables are set.
    pub fn apply_to<'c>(&self, command: &'c mut Command) -> &'c mut Command {
        command.env_clear().envs(&self.vars)
    }
}

impl<'a> IntoIterator for &'a ComposedEnv {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.vars.iter()
    }
}
