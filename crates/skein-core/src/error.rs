//! Error types for Skein

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using SkeinError
pub type Result<T> = std::result::Result<T, SkeinError>;

/// Main error type for Skein operations
#[derive(Debug, Error)]
pub enum SkeinError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Refused to overwrite an existing configuration file
    #[error("Configuration file already exists at {0}. Use --force to overwrite.")]
    AlreadyExists(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Shorthand for [`ConfigError::InvalidValue`]
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_display() {
        let err = ConfigError::invalid("base", "cannot be empty");
        assert_eq!(err.to_string(), "Invalid configuration: base - cannot be empty");
    }

    #[test]
    fn test_config_error_converts_transparently() {
        let err: SkeinError = ConfigError::invalid("min", "must be a boolean").into();
        assert!(matches!(err, SkeinError::Config(_)));
        assert_eq!(err.to_string(), "Invalid configuration: min - must be a boolean");
    }
}
