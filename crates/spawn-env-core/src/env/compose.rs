//! The composition transform.
//!
//! Precedence, lowest to highest: inherited base, configuration environment,
//! global overrides, per-call overrides. Block-list suppression runs last and
//! spares names re-supplied by global or per-call overrides.

use spawn_env_config::env_name_for_key;
use spawn_env_config::keys::is_translated_key;
use tracing::debug;

use super::markers::{is_marker, marker_env};
use super::snapshot::ProcessEnvironment;
use super::types::{BlockList, ComposedEnv, EnvMap};

static EMPTY_ENV: EnvMap = EnvMap::new();
static EMPTY_BLOCK_LIST: BlockList = BlockList::new();

/// Inputs to a single composition. All borrowed, none mutated.
#[derive(Debug, Clone, Copy)]
pub struct ComposeRequest<'a> {
    pub base: &'a ProcessEnvironment,
    pub global: &'a EnvMap,
    pub config_env: &'a EnvMap,
    /// `None` means no per-call mapping was given; `Some(empty)` composes
    /// identically but is reported as supplied.
    pub per_call: Option<&'a EnvMap>,
    pub block_list: &'a BlockList,
    pub inherit: bool,
}

impl<'a> ComposeRequest<'a> {
    /// Request that inherits `base` with every other input empty.
    pub fn new(base: &'a ProcessEnvironment) -> Self {
        Self {
            base,
            global: &EMPTY_ENV,
            config_env: &EMPTY_ENV,
            per_call: None,
            block_list: &EMPTY_BLOCK_LIST,
            inherit: true,
        }
    }

    pub fn with_global(mut self, global: &'a EnvMap) -> Self {
        self.global = global;
        self
    }

    pub fn with_config_env(mut self, config_env: &'a EnvMap) -> Self {
        self.config_env = config_env;
        self
    }

    pub fn with_per_call(mut self, per_call: &'a EnvMap) -> Self {
        self.per_call = Some(per_call);
        self
    }

    pub fn with_block_list(mut self, block_list: &'a BlockList) -> Self {
        self.block_list = block_list;
        self
    }

    pub fn with_inherit(mut self, inherit: bool) -> Self {
        self.inherit = inherit;
        self
    }

    /// True when `name` was explicitly supplied for this call, which exempts
    /// it from block-list suppression.
    fn explicitly_supplied(&self, name: &str) -> bool {
        self.global.contains_key(name) || self.per_call.is_some_and(|p| p.contains_key(name))
    }
}

/// Compose the environment for one spawn.
///
/// With `inherit` set, starts from the merged base and overlays the
/// configuration environment (translated keys under their exported names,
/// see [`env_name_for_key`]), then global overrides, then per-call
/// overrides. Without it, starts from the mandatory markers and overlays only
/// per-call overrides. Blocked names are then removed unless supplied by
/// global or per-call overrides; isolated-mode markers are never removed.
pub fn compose(request: &ComposeRequest<'_>) -> ComposedEnv {
    debug!(
        event = "core.env.compose_started",
        inherit = request.inherit,
        global_vars = request.global.len(),
        config_vars = request.config_env.len(),
        per_call_vars = ?request.per_call.map(EnvMap::len),
        blocked = request.block_list.len(),
    );

    let mut vars = if request.inherit {
        let mut vars = request.base.merged();
        overlay_config(&mut vars, request.config_env);
        overlay(&mut vars, request.global);
        vars
    } else {
        marker_env()
    };

    if let Some(per_call) = request.per_call {
        overlay(&mut vars, per_call);
    }

    let mut suppressed = 0usize;
    for name in request.block_list.iter() {
        if request.explicitly_supplied(name) || (!request.inherit && is_marker(name)) {
            continue;
        }
        if vars.remove(name).is_some() {
            suppressed += 1;
        }
    }

    debug!(
        event = "core.env.compose_completed",
        vars = vars.len(),
        suppressed = suppressed,
    );

    ComposedEnv::from_map(vars)
}

fn overlay(target: &mut EnvMap, layer: &EnvMap) {
    target.extend(layer.iter().map(|(k, v)| (k.clone(), v.clone())));
}

/// Overlay the configuration environment under its exported names.
///
/// Translated keys are written first so an entry already spelled with the
/// exported name wins when both are present.
fn overlay_config(target: &mut EnvMap, config_env: &EnvMap) {
    let (translated, verbatim): (Vec<_>, Vec<_>) =
        config_env.iter().partition(|(k, _)| is_translated_key(k));

    target.extend(
        translated
            .into_iter()
            .map(|(k, v)| (env_name_for_key(k), v.clone())),
    );
    target.extend(verbatim.into_iter().map(|(k, v)| (k.clone(), v.clone())));
}
