//! SQLite-backed audit writer.
//!
//! Appends to `flag_audit` through the audit pool only. The table rejects
//! updates and deletes, so the log can only grow.

use std::sync::Arc;

use async_trait::async_trait;
use flagstore_common::storage::{SqliteConnection, StorageError};
use flagstore_core::AuditWriter;
use flagstore_domain::{AuditRecord, Result as DomainResult};
use rusqlite::{params, Row};
use tokio::task;
use tracing::{debug, instrument};

use super::flag_repository::millis_to_datetime;
use super::manager::{DbManager, PoolId};
use crate::errors::{map_join_error, map_storage_error};

/// SQLite-backed audit trail.
pub struct SqliteAuditWriter {
    db: Arc<DbManager>,
}

impl SqliteAuditWriter {
    /// Create a new audit writer on the manager's audit pool
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuditWriter for SqliteAuditWriter {
    #[instrument(skip(self, record), fields(flag = %record.name, environment = %record.environment))]
    async fn append(&self, record: AuditRecord) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.acquire(PoolId::Audit)?;
            insert_record(&conn, &record).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)??;

        debug!("audit record appended");
        Ok(())
    }

    async fn history(&self, name: &str, environment: &str) -> DomainResult<Vec<AuditRecord>> {
        let db = Arc::clone(&self.db);
        let (name, environment) = (name.to_string(), environment.to_string());

        task::spawn_blocking(move || -> DomainResult<Vec<AuditRecord>> {
            let conn = db.acquire(PoolId::Audit)?;
            query_history(&conn, &name, &environment).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

// ============================================================================
// Synchronous SQL Operations (called inside spawn_blocking)
// ============================================================================

fn insert_record(conn: &SqliteConnection, record: &AuditRecord) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO flag_audit
            (name, enabled, user_name, color, children, dot, environment, audit_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            record.name,
            record.enabled,
            record.user_name,
            record.color,
            record.children,
            record.dot,
            record.environment,
            record.audit_date.timestamp_millis()
        ],
    )?;
    Ok(())
}

/// Append order is the insertion id order.
fn query_history(
    conn: &SqliteConnection,
    name: &str,
    environment: &str,
) -> Result<Vec<AuditRecord>, StorageError> {
    let mut stmt = conn.prepare(
        "SELECT name, enabled, user_name, color, children, dot, environment, audit_date
         FROM flag_audit
         WHERE name = ?1 AND environment = ?2
         ORDER BY id",
    )?;

    stmt.query_map(params![name, environment], map_audit_row)
}

fn map_audit_row(row: &Row<'_>) -> rusqlite::Result<AuditRecord> {
    Ok(AuditRecord {
        name: row.get(0)?,
        enabled: row.get(1)?,
        user_name: row.get(2)?,
        color: row.get(3)?,
        children: row.get(4)?,
        dot: row.get(5)?,
        environment: row.get(6)?,
        audit_date: millis_to_datetime(7, row.get(7)?)?,
    })
}
