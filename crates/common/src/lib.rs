//! Modular common utilities shared across flagstore crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: payload validation (schemas, validators, field errors)
//! - `platform`: pooled SQLite storage (pool, connections, pragmas, metrics)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod validation;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod storage;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "platform")]
pub use storage::{
    PoolMetrics, SqliteConnection, SqlitePool, SqlitePoolConfig, StorageError, StorageResult,
};
#[cfg(feature = "foundation")]
pub use validation::{
    FieldError, FieldSpec, FieldType, FieldValidator, OperationSchema, StringValidator,
    ValidatedPayload, ValidationError, ValidationResult, Validator,
};
