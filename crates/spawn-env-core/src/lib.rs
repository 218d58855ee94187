//! Core library for composing the environment of harness-spawned processes.
//!
//! The harness owns the long-lived stores (global overrides, configuration
//! environment, block list) through [`HarnessEnv`]; every spawn asks it for a
//! [`ComposedEnv`] and hands that to the process spawner.

pub mod env;
pub mod errors;
mod logging;

pub use env::{
    BlockList, ComposeRequest, ComposedEnv, EnvError, EnvMap, HarnessEnv, ProcessEnvironment,
    compose,
};
pub use errors::{SpawnEnvError, SpawnEnvResult};
pub use logging::init_logging;
pub use spawn_env_config::{ConfigError, HarnessConfig};
