//! Settings errors: file access and format problems ([`SettingsError`]) and
//! values that parse but make no sense ([`ConfigError`]).

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    /// Reading the config file failed
    #[error("Failed to load settings: {0}")]
    LoadError(String),

    /// Writing the config file failed
    #[error("Failed to save settings: {0}")]
    SaveError(String),

    /// No usable config directory on this platform, or it cannot be created
    #[error("Config directory error: {0}")]
    ConfigDirectory(String),

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("Malformed JSON config: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Malformed TOML config: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Cannot encode config as TOML: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// A config value outside what the application can run with
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Extension other than `.toml` or `.json`
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("Value out of range for '{key}': {value}")]
    ValueOutOfRange { key: String, value: String },

    /// `planner.base_url` is not http(s)
    #[error("Invalid planner URL: {0}")]
    InvalidUrl(String),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        let err = SettingsError::ConfigDirectory("no home".to_string());
        assert_eq!(err.to_string(), "Config directory error: no home");

        let err = ConfigError::ValueOutOfRange {
            key: "surface.width_px".to_string(),
            value: "0".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Value out of range for 'surface.width_px': 0"
        );

        let err = ConfigError::InvalidUrl("ftp://planner".to_string());
        assert_eq!(err.to_string(), "Invalid planner URL: ftp://planner");
    }

    #[test]
    fn test_validation_errors_convert() {
        let err: SettingsError = ConfigError::UnsupportedFormat("yaml".to_string()).into();
        assert!(matches!(err, SettingsError::Config(ConfigError::UnsupportedFormat(_))));
        assert_eq!(err.to_string(), "Config error: Unsupported config format: yaml");

        let err: SettingsError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, SettingsError::IoError(_)));
    }
}
