//! SQLite-backed flag repository.
//!
//! Implements the `FlagRepository` port over the flag pool. All database
//! operations run in `spawn_blocking` to avoid blocking the async runtime,
//! and every checkout is released when the closure returns.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use flagstore_common::storage::{SqliteConnection, StorageError};
use flagstore_core::FlagRepository;
use flagstore_domain::{
    now_millis, DeleteResult, Flag, FlagFilter, FlagUpdate, NewFlag, Result as DomainResult,
    UpdateResult,
};
use rusqlite::{params, params_from_iter, Row};
use tokio::task;
use tracing::{debug, instrument};

use super::filter_query::WhereClauseBuilder;
use super::manager::{DbManager, PoolId};
use crate::errors::{map_join_error, map_storage_error};

const FLAG_COLUMNS: &str =
    "name, enabled, project, environment, description, created_at, updated_at, last_toggle";

/// SQLite-backed flag repository.
pub struct SqliteFlagRepository {
    db: Arc<DbManager>,
}

impl SqliteFlagRepository {
    /// Create a new repository with the given database manager.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    async fn run<T, F>(&self, op: F) -> DomainResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&SqliteConnection) -> Result<T, StorageError> + Send + 'static,
    {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<T> {
            let conn = db.acquire(PoolId::Flags)?;
            op(&conn).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl FlagRepository for SqliteFlagRepository {
    #[instrument(skip(self, flag), fields(flag = %flag.name, environment = %flag.environment))]
    async fn create(&self, flag: NewFlag) -> DomainResult<Flag> {
        self.run(move |conn| insert_flag(conn, flag)).await
    }

    async fn read_by_key(&self, name: &str, enabled: Option<bool>) -> DomainResult<Vec<Flag>> {
        let filter = FlagFilter { name: Some(name.to_string()), enabled, ..FlagFilter::default() };
        self.read_by_filter(&filter).await
    }

    #[instrument(skip(self))]
    async fn read_by_filter(&self, filter: &FlagFilter) -> DomainResult<Vec<Flag>> {
        let builder = WhereClauseBuilder::from(filter);
        let flags = self.run(move |conn| query_flags(conn, builder)).await?;
        debug!(count = flags.len(), "flags read");
        Ok(flags)
    }

    #[instrument(skip(self, update))]
    async fn update(
        &self,
        name: &str,
        environment: &str,
        update: FlagUpdate,
    ) -> DomainResult<UpdateResult> {
        let name = name.to_string();
        let updated_count = self.run(move |conn| update_flag(conn, &name, &update)).await?;
        debug!(updated_count, "flag update applied");
        Ok(UpdateResult { updated_count })
    }

    #[instrument(skip(self))]
    async fn delete(&self, name: &str, environment: &str) -> DomainResult<DeleteResult> {
        let (name, environment) = (name.to_string(), environment.to_string());
        let deleted_count = self
            .run(move |conn| {
                conn.execute(
                    "DELETE FROM flags WHERE name = ?1 AND environment = ?2",
                    params![name, environment],
                )
            })
            .await?;
        Ok(DeleteResult { deleted_count })
    }
}

// ============================================================================
// Synchronous SQL Operations (called inside spawn_blocking)
// ============================================================================

fn insert_flag(conn: &SqliteConnection, new_flag: NewFlag) -> Result<Flag, StorageError> {
    let flag = new_flag.into_flag(now_millis());

    conn.execute(
        "INSERT INTO flags (name, enabled, project, environment, description, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            flag.name,
            flag.enabled,
            flag.project,
            flag.environment,
            flag.description,
            flag.created_at.timestamp_millis()
        ],
    )?;
    Ok(flag)
}

fn query_flags(
    conn: &SqliteConnection,
    builder: WhereClauseBuilder,
) -> Result<Vec<Flag>, StorageError> {
    let query = builder.render();
    let sql = format!("SELECT {FLAG_COLUMNS} FROM flags{} ORDER BY id", query.clause);

    let mut stmt = conn.prepare(&sql)?;
    stmt.query_map(params_from_iter(query.params.iter()), map_flag_row)
}

/// Rows are selected by name alone; the name is globally unique.
fn update_flag(
    conn: &SqliteConnection,
    name: &str,
    update: &FlagUpdate,
) -> Result<usize, StorageError> {
    let toggled_at = update.toggled_at.timestamp_millis();

    conn.execute(
        "UPDATE flags
         SET enabled = ?1,
             description = COALESCE(?2, description),
             updated_at = ?3,
             last_toggle = ?3
         WHERE name = ?4",
        params![update.enabled, update.description, toggled_at, name],
    )
}

fn map_flag_row(row: &Row<'_>) -> rusqlite::Result<Flag> {
    Ok(Flag {
        name: row.get(0)?,
        enabled: row.get(1)?,
        project: row.get(2)?,
        environment: row.get(3)?,
        description: row.get(4)?,
        created_at: millis_to_datetime(5, row.get(5)?)?,
        updated_at: row.get::<_, Option<i64>>(6)?.map(|ms| millis_to_datetime(6, ms)).transpose()?,
        last_toggle: row
            .get::<_, Option<i64>>(7)?
            .map(|ms| millis_to_datetime(7, ms))
            .transpose()?,
    })
}

pub(crate) fn millis_to_datetime(column: usize, ms: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(column, ms))
}

// ============================================================================
// Tests
// ============================================================================
