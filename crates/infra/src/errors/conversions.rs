//! Conversions from storage engine errors into domain errors.
//!
//! This is the only place that inspects `rusqlite` error codes. Everything
//! above the repositories sees a classified [`FlagStoreError`].

use flagstore_common::storage::StorageError;
use flagstore_domain::FlagStoreError;
use rusqlite::Error as SqlError;
use tokio::task::JoinError;

// SQLite extended result codes
const SQLITE_CONSTRAINT_PRIMARYKEY: i32 = 1555;
const SQLITE_CONSTRAINT_NOTNULL: i32 = 1299;
const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub FlagStoreError);

impl From<InfraError> for FlagStoreError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<FlagStoreError> for InfraError {
    fn from(value: FlagStoreError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoFlagStoreError {
    fn into_flagstore(self) -> FlagStoreError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → FlagStoreError */
/* -------------------------------------------------------------------------- */

impl IntoFlagStoreError for SqlError {
    fn into_flagstore(self) -> FlagStoreError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_else(|| err.to_string());
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked, _) => {
                        FlagStoreError::StorageUnavailable(message)
                    }
                    (
                        ErrorCode::ConstraintViolation,
                        SQLITE_CONSTRAINT_UNIQUE | SQLITE_CONSTRAINT_PRIMARYKEY,
                    ) => FlagStoreError::DuplicateKey(message),
                    (ErrorCode::ConstraintViolation, SQLITE_CONSTRAINT_NOTNULL) => {
                        FlagStoreError::NullConstraint { column: constraint_column(&message) }
                    }
                    (ErrorCode::CannotOpen | ErrorCode::NotADatabase, _) => {
                        FlagStoreError::StorageUnavailable(message)
                    }
                    _ => FlagStoreError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::FromSqlConversionFailure(_, _, cause) => {
                FlagStoreError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, name, ty) => {
                FlagStoreError::Database(format!("invalid column type for {name}: {ty}"))
            }
            RE::IntegralValueOutOfRange(column, value) => FlagStoreError::Database(format!(
                "value {value} out of range in column {column}"
            )),
            RE::InvalidQuery => FlagStoreError::Database("invalid SQL query".into()),
            other => FlagStoreError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_flagstore())
    }
}

/* -------------------------------------------------------------------------- */
/* StorageError → FlagStoreError */
/* -------------------------------------------------------------------------- */

impl IntoFlagStoreError for StorageError {
    fn into_flagstore(self) -> FlagStoreError {
        match self {
            StorageError::Rusqlite(err) => err.into_flagstore(),
            StorageError::PoolExhausted { waited_ms } => FlagStoreError::PoolExhausted(format!(
                "no connection available after {waited_ms}ms"
            )),
            StorageError::Connection(msg) => FlagStoreError::StorageUnavailable(msg),
            StorageError::R2d2(err) => FlagStoreError::StorageUnavailable(err.to_string()),
            StorageError::Io(err) => FlagStoreError::StorageUnavailable(err.to_string()),
            StorageError::InvalidConfig(msg) => FlagStoreError::Config(msg),
            StorageError::Query(msg) | StorageError::Migration(msg) => {
                FlagStoreError::Database(msg)
            }
        }
    }
}

impl From<StorageError> for InfraError {
    fn from(value: StorageError) -> Self {
        InfraError(value.into_flagstore())
    }
}

/// Classify a storage error at the repository boundary.
pub fn map_storage_error(err: StorageError) -> FlagStoreError {
    InfraError::from(err).into()
}

/// Map JoinError from spawn_blocking to FlagStoreError.
pub fn map_join_error(err: JoinError) -> FlagStoreError {
    if err.is_cancelled() {
        FlagStoreError::Internal("blocking task cancelled".into())
    } else {
        FlagStoreError::Internal(format!("blocking task failed: {err}"))
    }
}

/// Column named by a constraint message such as
/// `NOT NULL constraint failed: flags.project`.
fn constraint_column(message: &str) -> String {
    let qualified = message.rsplit(':').next().unwrap_or_default().trim();
    let column = qualified.rsplit('.').next().unwrap_or_default();

    if column.is_empty() {
        "unknown".to_string()
    } else {
        column.to_string()
    }
}
