//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading or validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required configuration variable is missing
    #[error("Missing required configuration: {var}")]
    MissingRequired { var: String },

    /// A configuration variable has an invalid value
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },

    /// Failed to load .env file
    #[error("Failed to load .env file from {path}: {source}")]
    EnvFileLoad {
        path: PathBuf,
        #[source]
        source: dotenv::Error,
    },

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    Validation(String),

    /// Invalid URL format
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),

    /// Invalid socket address format
    #[error("Invalid socket address: {0}")]
    InvalidSocketAddr(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_display() {
        let err = ConfigError::MissingRequired {
            var: "IDENTITY_REDIS_URL".to_string(),
        };
        assert!(err.to_string().contains("IDENTITY_REDIS_URL"));
        assert!(err.to_string().contains("Missing required"));
    }

    #[test]
    fn invalid_value_display() {
        let err = ConfigError::InvalidValue {
            var: "IDENTITY_SIGN_UP_COOLDOWN_SECS".to_string(),
            value: "abc".to_string(),
        };
        assert!(err.to_string().contains("IDENTITY_SIGN_UP_COOLDOWN_SECS"));
        assert!(err.to_string().contains("abc"));
    }
}
