//! Error types used throughout the flag store

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the flag store
///
/// Storage-engine errors are classified into these kinds at the repository
/// boundary; nothing above that boundary sees a raw engine error.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum FlagStoreError {
    #[error("Validation error: {field} {message}")]
    Validation { field: String, message: String },

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Null constraint violated on column {column}")]
    NullConstraint { column: String },

    #[error("Connection pool exhausted: {0}")]
    PoolExhausted(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FlagStoreError {
    /// Shorthand for a validation failure on one field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Whether the failure is transient. Nothing in this crate retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::PoolExhausted(_) | Self::StorageUnavailable(_))
    }

    /// Stable label for logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::DuplicateKey(_) => "duplicate_key",
            Self::NullConstraint { .. } => "null_constraint",
            Self::PoolExhausted(_) => "pool_exhausted",
            Self::StorageUnavailable(_) => "storage_unavailable",
            Self::Database(_) => "database",
            Self::Config(_) => "config",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for flag store operations
pub type Result<T> = std::result::Result<T, FlagStoreError>;
