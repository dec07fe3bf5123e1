//! Storage primitives for pooled SQLite databases
//!
//! This module provides generic storage infrastructure: an r2d2 connection
//! pool over rusqlite, scoped connection checkouts, per-connection pragmas
//! and pool metrics.

pub mod error;
pub mod metrics;
pub mod sqlite;
pub mod types;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use metrics::StorageMetrics;
pub use sqlite::{apply_connection_pragmas, SqliteConnection, SqlitePool, SqlitePoolConfig};
pub use types::{HealthStatus, PoolMetrics};
