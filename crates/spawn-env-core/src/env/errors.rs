//! Environment error types.

use spawn_env_config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error("Invalid environment variable name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error(transparent)]
    Config {
        #[from]
        source: ConfigError,
    },
}

/// Reject names that cannot be placed in a process environment block.
pub(super) fn check_name(name: &str) -> Result<(), EnvError> {
    match spawn_env_config::keys::env_name_problem(name) {
        Some(reason) => Err(EnvError::InvalidName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_name_display() {
        let error = check_name("A=B").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid environment variable name \"A=B\": must not contain '='"
        );
    }

    #[test]
    fn test_config_error_is_transparent() {
        let error = EnvError::from(ConfigError::InvalidConfiguration {
            message: "bad".to_string(),
        });
        assert_eq!(error.to_string(), "Invalid configuration: bad");
    }

    #[test]
    fn test_valid_name_passes() {
        assert!(check_name("X_FOO").is_ok());
        assert!(check_name("lower-case-is-fine").is_ok());
    }
}
