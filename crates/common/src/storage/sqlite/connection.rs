//! Pooled SQLite connection wrapper
//!
//! A checkout from [`SqlitePool`](super::SqlitePool). The connection goes back
//! to its pool when the wrapper is dropped, on every exit path.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection as RusqliteConnection, Params, Row, Statement as RusqliteStatement};
use tracing::{instrument, trace};

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::metrics::StorageMetrics;

/// Pooled SQLite connection
///
/// Wraps a pooled rusqlite connection. Release is tied to `Drop`, so a
/// connection is returned exactly once however the holder exits.
pub struct SqliteConnection {
    inner: PooledConnection<SqliteConnectionManager>,
    metrics: Arc<StorageMetrics>,
    pool_name: &'static str,
}

impl SqliteConnection {
    pub(crate) fn new(
        conn: PooledConnection<SqliteConnectionManager>,
        metrics: Arc<StorageMetrics>,
        pool_name: &'static str,
    ) -> Self {
        Self { inner: conn, metrics, pool_name }
    }

    /// Name of the pool this connection was checked out from
    pub fn pool_name(&self) -> &'static str {
        self.pool_name
    }

    /// Execute a SQL statement that doesn't return rows
    #[instrument(skip(self, params), fields(pool = self.pool_name, sql = %sql))]
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> StorageResult<usize> {
        self.inner.execute(sql, params).map_err(StorageError::from)
    }

    /// Execute a SQL query that returns a single row
    #[instrument(skip(self, params, f), fields(pool = self.pool_name, sql = %sql))]
    pub fn query_row<T, P, F>(&self, sql: &str, params: P, f: F) -> StorageResult<T>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> Result<T, rusqlite::Error>,
    {
        self.inner.query_row(sql, params, f).map_err(StorageError::from)
    }

    /// Prepare a SQL statement
    #[instrument(skip(self), fields(pool = self.pool_name, sql = %sql))]
    pub fn prepare(&self, sql: &str) -> StorageResult<SqliteStatement<'_>> {
        let stmt = self.inner.prepare(sql).map_err(StorageError::from)?;
        Ok(SqliteStatement::new(stmt))
    }

    /// Execute a batch of `;`-separated statements
    pub fn execute_batch(&self, sql: &str) -> StorageResult<()> {
        self.inner.execute_batch(sql).map_err(StorageError::from)
    }
}

impl Drop for SqliteConnection {
    fn drop(&mut self) {
        self.metrics.record_connection_released();
        trace!(pool = self.pool_name, "connection released");
    }
}

// Allow using SqliteConnection as RusqliteConnection
impl Deref for SqliteConnection {
    type Target = RusqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for SqliteConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

/// Prepared statement wrapper
pub struct SqliteStatement<'conn> {
    inner: RusqliteStatement<'conn>,
}

impl<'conn> SqliteStatement<'conn> {
    fn new(stmt: RusqliteStatement<'conn>) -> Self {
        Self { inner: stmt }
    }

    /// Execute the statement with parameters
    pub fn execute<P: Params>(&mut self, params: P) -> StorageResult<usize> {
        self.inner.execute(params).map_err(StorageError::from)
    }

    /// Query with the statement and collect mapped rows
    ///
    /// Returns a `Vec` rather than an iterator so the statement borrow ends
    /// here.
    pub fn query_map<T, P, F>(&mut self, params: P, mut f: F) -> StorageResult<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> Result<T, rusqlite::Error>,
    {
        let rows = self.inner.query_map(params, |row| f(row)).map_err(StorageError::from)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(StorageError::from)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for storage::sqlite::connection.
    use tempfile::TempDir;

    use super::*;
    use crate::storage::sqlite::{SqlitePool, SqlitePoolConfig};

    fn pool(dir: &TempDir) -> SqlitePool {
        SqlitePool::new("test", &dir.path().join("test.db"), SqlitePoolConfig::with_max_size(2))
            .unwrap()
    }

    #[test]
    fn test_connection_execute_and_query_row() {
        let temp_dir = TempDir::new().unwrap();
        let pool = pool(&temp_dir);
        let conn = pool.get_connection().unwrap();

        conn.execute("CREATE TABLE test (id INTEGER PRIMARY KEY, name TEXT)", []).unwrap();
        let inserted = conn.execute("INSERT INTO test (name) VALUES (?1)", ["Bob"]).unwrap();
        assert_eq!(inserted, 1);

        let name: String =
            conn.query_row("SELECT name FROM test WHERE id = ?1", [1], |row| row.get(0)).unwrap();
        assert_eq!(name, "Bob");
    }

    #[test]
    fn test_prepared_query_map_collects_rows() {
        let temp_dir = TempDir::new().unwrap();
        let pool = pool(&temp_dir);
        let conn = pool.get_connection().unwrap();

        conn.execute_batch(
            "CREATE TABLE test (id INTEGER PRIMARY KEY, name TEXT);
             INSERT INTO test (name) VALUES ('Charlie'), ('Diana');",
        )
        .unwrap();

        let mut stmt = conn.prepare("SELECT name FROM test ORDER BY id").unwrap();
        let names = stmt.query_map([], |row| row.get::<_, String>(0)).unwrap();
        assert_eq!(names, vec!["Charlie".to_string(), "Diana".to_string()]);
    }

    #[test]
    fn test_drop_records_release() {
        let temp_dir = TempDir::new().unwrap();
        let pool = pool(&temp_dir);

        {
            let conn = pool.get_connection().unwrap();
            assert_eq!(conn.pool_name(), "test");
            assert_eq!(pool.metrics().checked_out(), 1);
        }

        assert_eq!(pool.metrics().checked_out(), 0);
        assert_eq!(pool.metrics().snapshot().connections_released, 1);
    }
}
