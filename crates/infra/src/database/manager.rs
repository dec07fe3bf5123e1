//! Database connection manager with independent flag and audit pools.
//!
//! The two pools are sized and configured separately, so contention or
//! failure on audit writes never blocks flag reads or writes.

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use flagstore_common::storage::{
    HealthStatus, PoolMetrics, SqliteConnection, SqlitePool, SqlitePoolConfig, StorageError,
};
use flagstore_domain::{Config, DatabaseConfig, FlagStoreError, Result};
use rusqlite::params;
use tracing::{info, instrument, warn};

use crate::errors::map_storage_error;

const SCHEMA_VERSION: i32 = 1;
const FLAGS_SCHEMA_SQL: &str = include_str!("schema.sql");
const AUDIT_SCHEMA_SQL: &str = include_str!("audit_schema.sql");

/// Which pool a checkout comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolId {
    Flags,
    Audit,
}

impl PoolId {
    /// Pool name used in logs and error messages
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flags => "flags",
            Self::Audit => "audit",
        }
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Health of both pools
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseHealth {
    pub flags: HealthStatus,
    pub audit: HealthStatus,
}

impl DatabaseHealth {
    /// Both pools answered their probe
    pub fn is_healthy(&self) -> bool {
        self.flags.healthy && self.audit.healthy
    }
}

/// Database manager owning the flag pool and the audit pool.
pub struct DbManager {
    flags: Arc<SqlitePool>,
    audit: Arc<SqlitePool>,
}

impl DbManager {
    /// Open both pools from the loaded configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Self::open(&config.flags_db, &config.audit_db)
    }

    /// Open both pools from explicit database settings.
    ///
    /// The audit pool may point at the same file as the flag pool; it still
    /// gets its own connections.
    pub fn open(flags_db: &DatabaseConfig, audit_db: &DatabaseConfig) -> Result<Self> {
        let flags = open_pool(PoolId::Flags, flags_db)?;
        let audit = open_pool(PoolId::Audit, audit_db)?;

        info!(
            flags_db = %flags_db.path,
            audit_db = %audit_db.path,
            flags_pool_size = flags.metrics().max_pool_size(),
            audit_pool_size = audit.metrics().max_pool_size(),
            "database pools initialised"
        );

        Ok(Self { flags, audit })
    }

    /// Borrow one of the underlying pools.
    pub fn pool(&self, pool: PoolId) -> &Arc<SqlitePool> {
        match pool {
            PoolId::Flags => &self.flags,
            PoolId::Audit => &self.audit,
        }
    }

    /// Check a connection out of `pool`.
    ///
    /// The connection goes back to its pool when dropped, on every path.
    ///
    /// # Errors
    /// `PoolExhausted` when no connection frees up within the configured
    /// wait, `StorageUnavailable` for other checkout failures.
    pub fn acquire(&self, pool: PoolId) -> Result<SqliteConnection> {
        self.pool(pool).get_connection().map_err(|err| match err {
            StorageError::PoolExhausted { waited_ms } => FlagStoreError::PoolExhausted(format!(
                "{pool} pool: no connection available after {waited_ms}ms"
            )),
            other => map_storage_error(other),
        })
    }

    /// Ensure both schemas exist. Safe to run repeatedly.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<()> {
        let conn = self.acquire(PoolId::Flags)?;
        apply_schema(&conn, FLAGS_SCHEMA_SQL)?;
        drop(conn);

        let conn = self.acquire(PoolId::Audit)?;
        apply_schema(&conn, AUDIT_SCHEMA_SQL)?;

        info!(version = SCHEMA_VERSION, "database migrations applied");
        Ok(())
    }

    /// Probe both pools.
    pub fn health_check(&self) -> DatabaseHealth {
        let health = DatabaseHealth {
            flags: self.flags.health_check(),
            audit: self.audit.health_check(),
        };

        if !health.is_healthy() {
            warn!(
                flags = ?health.flags.message,
                audit = ?health.audit.message,
                "database health check failed"
            );
        }

        health
    }

    /// Checkout counters for one pool.
    pub fn metrics(&self, pool: PoolId) -> PoolMetrics {
        self.pool(pool).metrics_snapshot()
    }
}

fn open_pool(id: PoolId, db: &DatabaseConfig) -> Result<Arc<SqlitePool>> {
    let config = SqlitePoolConfig {
        max_size: db.pool_size.max(1),
        connection_timeout: Duration::from_millis(db.connection_timeout_ms),
        busy_timeout: Duration::from_millis(db.busy_timeout_ms),
        ..SqlitePoolConfig::default()
    };

    SqlitePool::new(id.as_str(), Path::new(&db.path), config)
        .map(Arc::new)
        .map_err(map_storage_error)
}

fn apply_schema(conn: &SqliteConnection, schema_sql: &str) -> Result<()> {
    conn.execute_batch(schema_sql).map_err(map_storage_error)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?1, ?2)",
        params![SCHEMA_VERSION, chrono::Utc::now().timestamp_millis()],
    )
    .map_err(map_storage_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn manager(dir: &TempDir) -> DbManager {
        let flags = DatabaseConfig::new(dir.path().join("flags.db").to_string_lossy());
        let audit = DatabaseConfig::new(dir.path().join("audit.db").to_string_lossy());
        DbManager::open(&flags, &audit).unwrap()
    }

    #[test]
    fn migrations_create_schema_version_on_both_databases() {
        let dir = TempDir::new().unwrap();
        let manager = manager(&dir);
        manager.run_migrations().unwrap();

        for pool in [PoolId::Flags, PoolId::Audit] {
            let conn = manager.acquire(pool).unwrap();
            let version: i32 = conn
                .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
                .unwrap();
            assert_eq!(version, SCHEMA_VERSION, "{pool} schema version");
        }
    }

    #[test]
    fn migrations_are_idempotent() {
        let dir = TempDir::new().unwrap();
        let manager = manager(&dir);
        manager.run_migrations().unwrap();
        manager.run_migrations().unwrap();

        let conn = manager.acquire(PoolId::Flags).unwrap();
        let rows: i64 =
            conn.query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0)).unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn audit_table_lives_in_the_audit_database() {
        let dir = TempDir::new().unwrap();
        let manager = manager(&dir);
        manager.run_migrations().unwrap();

        let conn = manager.acquire(PoolId::Flags).unwrap();
        let audit_tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'flag_audit'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(audit_tables, 0);
    }

    #[test]
    fn health_check_covers_both_pools() {
        let dir = TempDir::new().unwrap();
        let manager = manager(&dir);

        let health = manager.health_check();
        assert!(health.is_healthy());
        assert_eq!(health.flags.max_connections, 10);
    }

    #[test]
    fn exhausted_pool_maps_to_pool_exhausted() {
        let dir = TempDir::new().unwrap();
        let flags = DatabaseConfig::new(dir.path().join("flags.db").to_string_lossy())
            .with_pool_size(1)
            .with_connection_timeout_ms(100);
        let audit = DatabaseConfig::new(dir.path().join("audit.db").to_string_lossy());
        let manager = DbManager::open(&flags, &audit).unwrap();

        let _held = manager.acquire(PoolId::Flags).unwrap();
        let err = manager.acquire(PoolId::Flags).err().unwrap();
        assert!(matches!(err, FlagStoreError::PoolExhausted(ref msg) if msg.starts_with("flags pool")));

        // The audit pool is unaffected
        assert!(manager.acquire(PoolId::Audit).is_ok());
        assert_eq!(manager.metrics(PoolId::Flags).connections_timeout, 1);
    }

    #[test]
    fn unopenable_path_is_storage_unavailable() {
        let dir = TempDir::new().unwrap();
        let flags = DatabaseConfig::new(dir.path().join("missing").join("flags.db").to_string_lossy());
        let audit = DatabaseConfig::new(dir.path().join("audit.db").to_string_lossy());

        let result = DbManager::open(&flags, &audit);
        assert!(matches!(result, Err(FlagStoreError::StorageUnavailable(_))));
    }
}
