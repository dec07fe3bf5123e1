//! Port interfaces for the flag store
//!
//! Implementations own their table exclusively and classify every storage
//! engine error into a [`FlagStoreError`](flagstore_domain::FlagStoreError)
//! kind before returning it. Raw engine errors never cross these traits.

use async_trait::async_trait;
use flagstore_domain::{
    AuditRecord, DeleteResult, Flag, FlagFilter, FlagUpdate, NewFlag, Result, UpdateResult,
};

/// Port for persisting and querying flags.
///
/// Every call holds one connection from the flag pool for its duration and
/// releases it on every exit path.
#[async_trait]
pub trait FlagRepository: Send + Sync {
    /// Insert a new flag with `created_at` set to the current time.
    ///
    /// # Errors
    /// - `DuplicateKey` if the storage uniqueness constraint rejects the row
    /// - `NullConstraint` if a required column is missing
    /// - `PoolExhausted` / `StorageUnavailable` on connection failure
    async fn create(&self, flag: NewFlag) -> Result<Flag>;

    /// Exact-match lookup by name, narrowed by `enabled` when given.
    async fn read_by_key(&self, name: &str, enabled: Option<bool>) -> Result<Vec<Flag>>;

    /// Lookup with only the conditions present in `filter`, ANDed.
    ///
    /// An empty filter returns every flag.
    async fn read_by_filter(&self, filter: &FlagFilter) -> Result<Vec<Flag>>;

    /// Apply a toggle to the row matching `name`.
    ///
    /// The row is selected by name alone; `environment` identifies the
    /// caller's intent for logging. Returns the affected-row count, which is
    /// 0 when no flag has that name.
    async fn update(&self, name: &str, environment: &str, update: FlagUpdate)
        -> Result<UpdateResult>;

    /// Remove rows matching both `name` and `environment`.
    ///
    /// Deleting a missing flag succeeds with a count of 0.
    async fn delete(&self, name: &str, environment: &str) -> Result<DeleteResult>;
}

/// Port for the append-only audit trail.
///
/// Uses the audit pool, so contention here never blocks flag operations.
#[async_trait]
pub trait AuditWriter: Send + Sync {
    /// Append one record. Records are never mutated or deleted.
    async fn append(&self, record: AuditRecord) -> Result<()>;

    /// Records for one flag in append order.
    async fn history(&self, name: &str, environment: &str) -> Result<Vec<AuditRecord>>;
}
