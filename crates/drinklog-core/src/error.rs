//! Core error types for drinklog-core.
//!
//! This module defines the error hierarchy using thiserror. Load failures,
//! storage resolution failures and flush failures are kept apart so callers
//! can pick a policy for each.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for drinklog-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The backing file exists but does not hold a valid entry log.
    #[error("Corrupt data in {path}: {message}")]
    CorruptData { path: PathBuf, message: String },

    /// The storage location could not be resolved or created.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Writing the backing file failed.
    #[error("Failed to persist entries to {path}: {reason}")]
    PersistenceWrite { path: PathBuf, reason: String },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Deep-link errors
    #[error("Deep link error: {0}")]
    DeepLink(#[from] DeepLinkError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Entry amount below one
    #[error("Invalid amount {0}: an entry must count at least one unit")]
    InvalidAmount(u32),

    /// Entry id already present in the log
    #[error("Duplicate entry id: {0}")]
    DuplicateId(String),
}

/// Errors raised while parsing an inbound `widget://stats/<N>` link.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeepLinkError {
    #[error("Invalid URL '{0}'")]
    InvalidUrl(String),

    #[error("Unsupported scheme '{0}', expected 'widget'")]
    UnsupportedScheme(String),

    #[error("Unsupported host '{0}', expected 'stats'")]
    UnsupportedHost(String),

    #[error("Day offset '{0}' is not a non-negative integer")]
    InvalidOffset(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_converts_into_core_error() {
        let err: CoreError = ValidationError::InvalidAmount(0).into();
        assert!(matches!(err, CoreError::Validation(ValidationError::InvalidAmount(0))));
        assert!(err.to_string().contains("at least one unit"));
    }

    #[test]
    fn test_corrupt_data_message_names_path() {
        let err = CoreError::CorruptData {
            path: PathBuf::from("/tmp/entries.json"),
            message: "expected value".into(),
        };
        assert_eq!(
            err.to_string(),
            "Corrupt data in /tmp/entries.json: expected value"
        );
    }
}
