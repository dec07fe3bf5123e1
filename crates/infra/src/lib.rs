//! # Flagstore Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The two-pool database manager and SQL schemas
//! - SQLite implementations of `FlagRepository` and `AuditWriter`
//! - Storage error classification
//! - Configuration loading and tracing initialisation
//!
//! ## Architecture
//! - Implements traits defined in `flagstore-core`
//! - Contains all "impure" code (I/O, environment)

pub mod config;
pub mod database;
pub mod errors;
pub mod observability;

// Re-export commonly used items
pub use database::*;
pub use errors::InfraError;
pub use observability::init_tracing;
