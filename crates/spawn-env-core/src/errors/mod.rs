use std::error::Error;

pub use spawn_env_config::ConfigError;

pub use crate::env::EnvError;

/// Base trait for all library errors
pub trait SpawnEnvError: Error + Send + Sync + 'static {
    /// Error code for programmatic handling
    fn error_code(&self) -> &'static str;

    /// Whether this error should be logged as an error or warning
    fn is_user_error(&self) -> bool {
        false
    }
}

/// Common result type for the library
pub type SpawnEnvResult<T> = Result<T, Box<dyn SpawnEnvError>>;

impl SpawnEnvError for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::ConfigNotFound { .. } => "CONFIG_NOT_FOUND",
            ConfigError::ConfigParseError { .. } => "CONFIG_PARSE_ERROR",
            ConfigError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            ConfigError::IoError { .. } => "CONFIG_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            ConfigError::ConfigNotFound { .. }
                | ConfigError::ConfigParseError { .. }
                | ConfigError::InvalidConfiguration { .. }
        )
    }
}

impl SpawnEnvError for EnvError {
    fn error_code(&self) -> &'static str {
        match self {
            EnvError::InvalidName { .. } => "ENV_INVALID_NAME",
            EnvError::Config { source } => source.error_code(),
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            EnvError::InvalidName { .. } => true,
            EnvError::Config { source } => source.is_user_error(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_env_result() {
        let _result: SpawnEnvResult<i32> = Ok(42);
    }

    #[test]
    fn test_config_error_codes() {
        let error = ConfigError::InvalidConfiguration {
            message: "env key 'cache-dir' must be a string, got integer".to_string(),
        };
        assert_eq!(error.error_code(), "INVALID_CONFIGURATION");
        assert!(error.is_user_error());

        let error = ConfigError::IoError {
            source: std::io::Error::other("disk on fire"),
        };
        assert_eq!(error.error_code(), "CONFIG_IO_ERROR");
        assert!(!error.is_user_error());
    }

    #[test]
    fn test_env_error_delegates_to_config_error() {
        let error = EnvError::Config {
            source: ConfigError::ConfigParseError {
                message: "expected '='".to_string(),
            },
        };
        assert_eq!(error.error_code(), "CONFIG_PARSE_ERROR");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_boxed_env_error() {
        let result: SpawnEnvResult<()> = Err(Box::new(EnvError::InvalidName {
            name: String::new(),
            reason: "must not be empty",
        }));
        let err = result.unwrap_err();
        assert_eq!(err.error_code(), "ENV_INVALID_NAME");
        assert!(err.is_user_error());
    }
}
