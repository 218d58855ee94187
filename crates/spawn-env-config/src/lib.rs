//! Harness configuration for spawned-process environments.
//!
//! Provides the `[env]` and `[inherit]` TOML schema, validation, and the
//! translation of kebab-case configuration keys into prefixed variable names.

pub mod errors;
pub mod keys;
mod loading;
pub mod types;

pub use errors::ConfigError;
pub use keys::{ENV_PREFIX, HOST_REQUEST_MARKER, TRANSLATED_KEYS, env_name_for_key, translate_env};
pub use types::{BlockSpec, HarnessConfig, InheritConfig};
