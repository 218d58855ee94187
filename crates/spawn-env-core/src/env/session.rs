//! Session-lifetime environment stores.
//!
//! [`HarnessEnv`] owns the state that outlives a single spawn: global
//! overrides (merged across calls, never cleared), the configuration
//! environment (fixed at start), and the block list (grows across calls).
//! Each composition snapshots the mutable stores under a read lock before
//! running the pure transform, so a concurrent writer is observed either
//! entirely or not at all.

use std::sync::{PoisonError, RwLock};

use spawn_env_config::{HarnessConfig, translate_env};
use tracing::{debug, info};

use super::compose::{ComposeRequest, compose};
use super::errors::{EnvError, check_name};
use super::snapshot::ProcessEnvironment;
use super::types::{BlockList, ComposedEnv, EnvMap};

#[derive(Debug, Default)]
pub struct HarnessEnv {
    config_env: EnvMap,
    global: RwLock<EnvMap>,
    block_list: RwLock<BlockList>,
}

impl HarnessEnv {
    /// Create a session with a fixed configuration environment and an
    /// initial block list.
    ///
    /// Configuration keys are translated to the names they are exported as,
    /// so `disable-auto-check-update` is stored as
    /// `WP_CLI_DISABLE_AUTO_CHECK_UPDATE`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::Config`] wrapping
    /// [`ConfigError::InvalidConfiguration`](spawn_env_config::ConfigError::InvalidConfiguration)
    /// when a configuration entry is malformed or two keys resolve to the
    /// same name, and [`EnvError::InvalidName`] when a block-list name cannot
    /// be a process environment variable name.
    pub fn new(config_env: EnvMap, block_list: BlockList) -> Result<Self, EnvError> {
        let config_env = translate_env(&config_env)?;
        for name in block_list.iter() {
            check_name(name)?;
        }

        Ok(Self {
            config_env,
            global: RwLock::new(EnvMap::new()),
            block_list: RwLock::new(block_list),
        })
    }

    /// Create a session from loaded harness configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::Config`] wrapping
    /// [`ConfigError::InvalidConfiguration`](spawn_env_config::ConfigError::InvalidConfiguration)
    /// when the `[env]` or `[inherit]` sections are malformed.
    pub fn from_config(config: &HarnessConfig) -> Result<Self, EnvError> {
        let config_env = config.config_env()?;
        let block_list: BlockList = config.blocked_names()?.into_iter().collect();

        info!(
            event = "core.env.session_created",
            config_vars = config_env.len(),
            blocked = block_list.len(),
        );

        Self::new(config_env, block_list)
    }

    /// Merge `vars` into the global overrides.
    ///
    /// Existing keys are replaced, absent keys are kept. The merge is
    /// all-or-nothing: if any name is invalid nothing is written.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::InvalidName`] for a name that cannot be a process
    /// environment variable name.
    pub fn set_global_env<I, K, V>(&self, vars: I) -> Result<(), EnvError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: Vec<(String, String)> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        for (name, _) in &vars {
            check_name(name)?;
        }

        let count = vars.len();
        let mut global = self.global.write().unwrap_or_else(PoisonError::into_inner);
        global.extend(vars);

        info!(
            event = "core.env.global_env_merged",
            merged = count,
            total = global.len(),
        );
        Ok(())
    }

    /// Stop inheriting `names` from the base, configuration and global
    /// layers. Accumulates across calls.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::InvalidName`] for a name that cannot be a process
    /// environment variable name.
    pub fn dont_inherit<I, S>(&self, names: I) -> Result<(), EnvError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        for name in &names {
            check_name(name)?;
        }

        let mut block_list = self
            .block_list
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        block_list.extend(names);

        info!(event = "core.env.block_list_extended", total = block_list.len());
        Ok(())
    }

    pub fn config_env(&self) -> &EnvMap {
        &self.config_env
    }

    /// Copy of the current global overrides.
    pub fn global_env(&self) -> EnvMap {
        self.global
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Copy of the current block list.
    pub fn block_list(&self) -> BlockList {
        self.block_list
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Compose the environment for one spawn against `base`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::InvalidName`] when a per-call name cannot be a
    /// process environment variable name.
    pub fn compose(
        &self,
        base: &ProcessEnvironment,
        per_call: Option<&EnvMap>,
        inherit: bool,
    ) -> Result<ComposedEnv, EnvError> {
        if let Some(per_call) = per_call {
            for name in per_call.keys() {
                check_name(name)?;
            }
        }

        let global = self.global_env();
        let block_list = self.block_list();

        let mut request = ComposeRequest::new(base)
            .with_global(&global)
            .with_config_env(&self.config_env)
            .with_block_list(&block_list)
            .with_inherit(inherit);
        if let Some(per_call) = per_call {
            request = request.with_per_call(per_call);
        }

        let composed = compose(&request);
        debug!(event = "core.env.session_compose_completed", vars = composed.len());
        Ok(composed)
    }
}
