use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::keys::{HOST_REQUEST_MARKER, env_name_problem, is_reserved_key, translate_env};

/// Harness configuration as read from TOML.
///
/// ```toml
/// [env]
/// FOO = "BAR"
/// disable-auto-check-update = "1"
///
/// [inherit]
/// block = "FOO_BLOCKED"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// Raw `[env]` entries, keyed as written in the file.
    #[serde(default)]
    pub env: BTreeMap<String, toml::Value>,

    #[serde(default)]
    pub inherit: InheritConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InheritConfig {
    /// Variables whose inherited values must not reach the spawned process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<BlockSpec>,
}

/// A block list written either as a single name or as a list of names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockSpec {
    One(String),
    Many(Vec<String>),
}

impl BlockSpec {
    pub fn names(&self) -> Vec<String> {
        match self {
            BlockSpec::One(name) => vec![name.clone()],
            BlockSpec::Many(names) => names.clone(),
        }
    }
}

impl HarnessConfig {
    /// Build the configuration-sourced environment.
    ///
    /// Translated keys are exported under their prefixed name only; every
    /// other key is exported verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfiguration`] when a name cannot be
    /// placed in a process environment, when a reserved key carries a
    /// non-string value, when a value is not a scalar, or when two entries
    /// resolve to the same variable name.
    pub fn config_env(&self) -> Result<BTreeMap<String, String>, ConfigError> {
        let mut rendered: BTreeMap<String, String> = BTreeMap::new();
        for (key, value) in &self.env {
            rendered.insert(key.clone(), render_value(key, value)?);
        }
        translate_env(&rendered)
    }

    /// Names listed under `[inherit] block`, in file order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfiguration`] when a name cannot be a
    /// process environment variable name.
    pub fn blocked_names(&self) -> Result<Vec<String>, ConfigError> {
        let names = self
            .inherit
            .block
            .as_ref()
            .map(BlockSpec::names)
            .unwrap_or_default();

        for name in &names {
            if let Some(problem) = env_name_problem(name) {
                return Err(ConfigError::invalid(format!(
                    "blocked name {:?} {}",
                    name, problem
                )));
            }
        }

        Ok(names)
    }

    /// Run every check performed by [`config_env`](Self::config_env) and
    /// [`blocked_names`](Self::blocked_names).
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::InvalidConfiguration`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.config_env()?;
        self.blocked_names()?;
        Ok(())
    }
}

fn render_value(key: &str, value: &toml::Value) -> Result<String, ConfigError> {
    if let toml::Value::String(s) = value {
        if s.contains('\0') {
            return Err(ConfigError::invalid(format!(
                "env value for '{}' must not contain NUL",
                key
            )));
        }
        return Ok(s.clone());
    }

    if is_reserved_key(key) {
        let what = if key == HOST_REQUEST_MARKER {
            "reserved marker"
        } else {
            "env key"
        };
        return Err(ConfigError::invalid(format!(
            "{} '{}' must be a string, got {}",
            what,
            key,
            value.type_str()
        )));
    }

    match value {
        toml::Value::Integer(i) => Ok(i.to_string()),
        toml::Value::Float(f) => Ok(f.to_string()),
        toml::Value::Boolean(b) => Ok(if *b { "1" } else { "0" }.to_string()),
        other => Err(ConfigError::invalid(format!(
            "env value for '{}' must be a string, number or boolean, got {}",
            key,
            other.type_str()
        ))),
    }
}
