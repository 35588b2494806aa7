//! Core error types for pacekeeper-core.
//!
//! Only the I/O surfaces (stores, configuration) return these. The timer
//! engine, recorder and analyzer are infallible and degrade to defaults.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pacekeeper-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Store-related errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Plan rejected at the authoring boundary
    #[error("Invalid plan: {0}")]
    Validation(#[from] ValidationError),

    /// A referenced plan or segment does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Store-specific errors.
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

    /// A persisted entry could not be decoded
    #[error("Stored entry '{key}' is corrupt: {message}")]
    Corrupt { key: String, message: String },
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

    /// Key does not address an existing value
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Plan authoring errors. The messages are shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("plan title must not be empty")]
    EmptyTitle,

    #[error("plan must contain at least one segment")]
    EmptyPlan,

    #[error("segment id '{0}' is used more than once")]
    DuplicateSegmentId(String),

    #[error("plan '{plan}' lasts {actual_min} minutes, sessions must last exactly {expected_min}")]
    DurationMismatch {
        plan: String,
        expected_min: u64,
        actual_min: u64,
    },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) if e.code == rusqlite::ErrorCode::DatabaseLocked => {
                StoreError::Locked
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Store(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_mismatch_message_is_user_readable() {
        let err = ValidationError::DurationMismatch {
            plan: "Legs".into(),
            expected_min: 45,
            actual_min: 40,
        };
        assert_eq!(
            err.to_string(),
            "plan 'Legs' lasts 40 minutes, sessions must last exactly 45"
        );
    }

    #[test]
    fn sqlite_errors_convert_to_query_failed() {
        let err: StoreError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, StoreError::QueryFailed(_)));
    }
}
