//! Translation of kebab-case configuration keys into environment variable names.
//!
//! A handful of configuration keys are not exported verbatim: the spawned CLI
//! reads them from prefixed upper-snake-case variables instead. The table is
//! closed; any key not listed here passes through unchanged.

use std::collections::BTreeMap;

use crate::errors::ConfigError;

/// Namespace prefix for translated keys.
pub const ENV_PREFIX: &str = "WP_CLI_";

/// Configuration keys that are exported under a prefixed variable name.
///
/// Entries are lower-kebab-case. This is enforced by tests.
pub const TRANSLATED_KEYS: &[&str] = &[
    "cache-dir",
    "config-path",
    "custom-shell",
    "disable-auto-check-update",
    "packages-dir",
    "strict-args-mode",
];

/// Name of the variable the harness sets on every isolated (non-inheriting)
/// spawn. Configuration must not redefine it with a non-string value.
pub const HOST_REQUEST_MARKER: &str = "WPBROWSER_HOST_REQUEST";

/// Returns true when `key` is one of the translated configuration keys.
pub fn is_translated_key(key: &str) -> bool {
    TRANSLATED_KEYS.contains(&key)
}

/// Returns true when `key` names something the harness reserves: a translated
/// key or the host request marker.
pub fn is_reserved_key(key: &str) -> bool {
    is_translated_key(key) || key == HOST_REQUEST_MARKER
}

/// Map a configuration key to the environment variable name it is exported as.
///
/// `disable-auto-check-update` becomes `WP_CLI_DISABLE_AUTO_CHECK_UPDATE`.
/// Keys outside [`TRANSLATED_KEYS`] are returned unchanged.
pub fn env_name_for_key(key: &str) -> String {
    if !is_translated_key(key) {
        return key.to_string();
    }

    let mut name = String::with_capacity(ENV_PREFIX.len() + key.len());
    name.push_str(ENV_PREFIX);
    name.extend(
        key.chars()
            .map(|c| if c == '-' { '_' } else { c.to_ascii_uppercase() }),
    );
    name
}

/// Check that `name` can be placed in a process environment block.
///
/// Returns a description of the problem, or `None` when the name is usable.
pub fn env_name_problem(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        Some("must not be empty")
    } else if name.contains('=') {
        Some("must not contain '='")
    } else if name.contains('\0') {
        Some("must not contain NUL")
    } else {
        None
    }
}

/// Translate a configuration environment into the names it is exported as.
///
/// Every key goes through [`env_name_for_key`]; names already translated
/// pass through unchanged, so translating twice is harmless.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidConfiguration`] when a key cannot be placed
/// in a process environment, when a value contains NUL, or when two keys
/// resolve to the same variable name (for example `disable-auto-check-update`
/// alongside `WP_CLI_DISABLE_AUTO_CHECK_UPDATE`).
pub fn translate_env(
    config_env: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, String>, ConfigError> {
    let mut resolved: BTreeMap<String, String> = BTreeMap::new();
    let mut origin: BTreeMap<String, &str> = BTreeMap::new();

    for (key, value) in config_env {
        if let Some(problem) = env_name_problem(key) {
            return Err(ConfigError::invalid(format!(
                "env key {:?} {}",
                key, problem
            )));
        }
        if value.contains('\0') {
            return Err(ConfigError::invalid(format!(
                "env value for '{}' must not contain NUL",
                key
            )));
        }

        let name = env_name_for_key(key);
        if let Some(previous) = origin.insert(name.clone(), key) {
            return Err(ConfigError::invalid(format!(
                "env keys '{}' and '{}' both set {}",
                previous, key, name
            )));
        }
        resolved.insert(name, value.clone());
    }

    Ok(resolved)
}
