//! Reading harness configuration from disk.

use std::path::Path;

use tracing::{debug, info};

use crate::errors::ConfigError;
use crate::types::HarnessConfig;

impl HarnessConfig {
    /// Load and validate configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ConfigNotFound`] when the file does not exist,
    /// [`ConfigError::ConfigParseError`] when it is not valid TOML for this
    /// schema, and [`ConfigError::InvalidConfiguration`] when an entry fails
    /// validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(event = "config.load_started", path = %path.display());

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::ConfigNotFound {
                    path: path.display().to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let config = Self::from_toml_str(&text)?;

        info!(
            event = "config.load_completed",
            path = %path.display(),
            env_entries = config.env.len(),
            blocked = config.inherit.block.as_ref().map_or(0, |b| b.names().len()),
        );

        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ConfigParseError`] or
    /// [`ConfigError::InvalidConfiguration`].
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: HarnessConfig =
            toml::from_str(text).map_err(|e| ConfigError::ConfigParseError {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = HarnessConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigNotFound { .. }));
    }

    #[test]
    fn test_load_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[env]\nFOO = \"BAR\"\ndisable-auto-check-update = \"1\"\n\n[inherit]\nblock = \"FOO_BLOCKED\""
        )
        .unwrap();

        let config = HarnessConfig::load(file.path()).unwrap();
        let env = config.config_env().unwrap();
        assert_eq!(env["FOO"], "BAR");
        assert_eq!(env["WP_CLI_DISABLE_AUTO_CHECK_UPDATE"], "1");
        assert_eq!(config.blocked_names().unwrap(), vec!["FOO_BLOCKED"]);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = HarnessConfig::from_toml_str("[env\nFOO = ").unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
    }

    #[test]
    fn test_invalid_entry_fails_at_load_time() {
        let err =
            HarnessConfig::from_toml_str("[env]\ndisable-auto-check-update = 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfiguration { .. }));
    }
}
