//! Core error types for steppet-core.
//!
//! This module defines the error hierarchy using thiserror. None of these
//! errors is fatal to the engine: input errors are rejected at the boundary,
//! balance errors are plain failure results, and persistence errors fall back
//! to in-memory state.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for steppet-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistence-related errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rejected input
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Rejected credit spend or purchase
    #[error("Credit error: {0}")]
    Credit(#[from] CreditError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Snapshot store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Store is locked")]
    Locked,

    /// A snapshot exists but could not be decoded
    #[error("Snapshot is corrupt: {0}")]
    Corrupt(String),

    /// A snapshot was written by a newer schema
    #[error("Snapshot version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Could not resolve the data directory
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Input rejected at the engine boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Step goal must be positive")]
    NonPositiveGoal,

    #[error("Step count must not be negative (got {0})")]
    NegativeSteps(i64),

    #[error("Purchased credit amount must be positive")]
    NonPositivePurchase,

    #[error("Unknown achievement: {0}")]
    UnknownAchievement(String),

    #[error("Unknown credit product: {0}")]
    UnknownProduct(String),

    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Credit ledger failures.
///
/// Both variants leave the ledger untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CreditError {
    #[error("Invalid spend cost {cost}: must be between 1 and {max}")]
    InvalidCost { cost: u32, max: u32 },

    #[error("Insufficient credits: cost {cost}, available {available}")]
    InsufficientBalance { cost: u32, available: u32 },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked
                    || err.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credit_error_messages_name_the_amounts() {
        let err = CreditError::InsufficientBalance { cost: 3, available: 2 };
        assert_eq!(err.to_string(), "Insufficient credits: cost 3, available 2");
    }

    #[test]
    fn core_error_wraps_validation() {
        let err: CoreError = ValidationError::NonPositiveGoal.into();
        assert!(matches!(err, CoreError::Validation(ValidationError::NonPositiveGoal)));
        assert!(err.to_string().contains("Step goal must be positive"));
    }
}
