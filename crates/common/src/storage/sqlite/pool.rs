//! SQLite connection pool
//!
//! Provides r2d2-based connection pooling for SQLite databases. Each pool is
//! named so that log lines and errors say which pool ran dry.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use tracing::{debug, info, instrument, warn};

use super::config::SqlitePoolConfig;
use super::connection::SqliteConnection;
use super::pragmas::apply_connection_pragmas;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::metrics::StorageMetrics;
use crate::storage::types::{HealthStatus, PoolMetrics};

/// SQLite connection pool
///
/// Manages a bounded set of SQLite connections using r2d2.
///
/// - Checkouts wait at most `connection_timeout`; a checkout that times out
///   while every connection is in use fails with
///   [`StorageError::PoolExhausted`]
/// - Pragmas (WAL, busy timeout) applied to each new connection
/// - Checkout/release counters in [`StorageMetrics`]
#[derive(Debug)]
pub struct SqlitePool {
    name: &'static str,
    pool: Pool<SqliteConnectionManager>,
    config: SqlitePoolConfig,
    metrics: Arc<StorageMetrics>,
}

impl SqlitePool {
    /// Create a new SQLite connection pool
    ///
    /// # Arguments
    /// * `name` - Pool label used in logs and metrics
    /// * `path` - Path to the database file
    /// * `config` - Pool configuration
    ///
    /// # Errors
    /// Returns an error if the database file can't be opened or the pool
    /// cannot be built.
    #[instrument(fields(db_path = ?path, pool_size = config.max_size))]
    pub fn new(name: &'static str, path: &Path, config: SqlitePoolConfig) -> StorageResult<Self> {
        info!(pool = name, "Creating SQLite connection pool");

        let metrics = Arc::new(StorageMetrics::new(config.max_size));

        let pool_config = config.clone();
        let manager = SqliteConnectionManager::file(path).with_init(move |conn| {
            apply_connection_pragmas(conn, &pool_config)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
        });

        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .map_err(|e| {
                warn!(pool = name, "Failed to create connection pool: {}", e);
                StorageError::Connection(format!("Failed to create pool: {e}"))
            })?;

        // Smoke-test one connection so a bad path fails here, not on first use
        {
            let conn = pool.get().map_err(|e| {
                warn!(pool = name, "Failed to get test connection: {}", e);
                StorageError::Connection(format!("Failed to get test connection: {e}"))
            })?;
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            debug!(pool = name, "Test connection verified");
        }

        info!(pool = name, "SQLite pool created with {} connections", config.max_size);

        Ok(Self { name, pool, config, metrics })
    }

    /// Pool label
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get the pool metrics
    pub fn metrics(&self) -> &Arc<StorageMetrics> {
        &self.metrics
    }

    /// Point-in-time copy of the pool counters
    pub fn metrics_snapshot(&self) -> PoolMetrics {
        self.metrics.snapshot()
    }

    /// Check a connection out of the pool
    ///
    /// Waits up to the configured `connection_timeout`. The returned
    /// connection is released when dropped.
    #[instrument(skip(self), fields(pool = self.name, pool_size = self.config.max_size))]
    pub fn get_connection(&self) -> StorageResult<SqliteConnection> {
        let start = Instant::now();

        match self.pool.get() {
            Ok(conn) => {
                let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                self.metrics.record_connection_acquired(duration_ms);
                debug!("Connection acquired in {}ms", duration_ms);
                Ok(SqliteConnection::new(conn, Arc::clone(&self.metrics), self.name))
            }
            Err(e) => {
                let waited_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                let state = self.pool.state();

                if state.idle_connections == 0 && state.connections >= self.config.max_size {
                    self.metrics.record_connection_timeout();
                    warn!(waited_ms, "Connection pool exhausted");
                    Err(StorageError::PoolExhausted { waited_ms })
                } else {
                    self.metrics.record_connection_error();
                    warn!("Connection error: {}", e);
                    Err(StorageError::Connection(format!("Failed to get connection: {e}")))
                }
            }
        }
    }

    /// Check pool health by checking out and probing a connection
    pub fn health_check(&self) -> HealthStatus {
        let state = self.pool.state();

        match self.pool.get() {
            Ok(conn) => match conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0)) {
                Ok(_) => HealthStatus::healthy(
                    state.connections as usize,
                    state.idle_connections as usize,
                    self.config.max_size as usize,
                ),
                Err(e) => HealthStatus::unhealthy(format!("Probe query failed: {e}")),
            },
            Err(e) => HealthStatus::unhealthy(format!("Pool unhealthy: {e}")),
        }
    }
}
