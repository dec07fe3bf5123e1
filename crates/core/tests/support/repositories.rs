//! In-memory mock implementations of the core ports
//!
//! The flag mock enforces the same global name uniqueness as the SQLite
//! schema and counts every call so tests can assert that rejected payloads
//! never reached storage.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use flagstore_core::{AuditWriter, FlagRepository};
use flagstore_domain::{
    now_millis, AuditRecord, DeleteResult, Flag, FlagFilter, FlagStoreError, FlagUpdate, NewFlag,
    Result as DomainResult, UpdateResult,
};

/// In-memory mock for `FlagRepository`.
#[derive(Default)]
pub struct InMemoryFlagRepository {
    flags: Mutex<Vec<Flag>>,
    calls: AtomicUsize,
    update_error: Mutex<Option<FlagStoreError>>,
}

impl InMemoryFlagRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a stored flag directly.
    pub fn with_flag(self, new_flag: NewFlag) -> Self {
        self.flags.lock().unwrap().push(new_flag.into_flag(now_millis()));
        self
    }

    /// Make every subsequent `update` fail with `err`.
    pub fn fail_updates_with(&self, err: FlagStoreError) {
        *self.update_error.lock().unwrap() = Some(err);
    }

    /// Number of port calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Vec<Flag> {
        self.flags.lock().unwrap().clone()
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl FlagRepository for InMemoryFlagRepository {
    async fn create(&self, new_flag: NewFlag) -> DomainResult<Flag> {
        self.record_call();
        let mut flags = self.flags.lock().unwrap();
        if flags.iter().any(|f| f.name == new_flag.name) {
            return Err(FlagStoreError::DuplicateKey(new_flag.name));
        }
        let flag = new_flag.into_flag(now_millis());
        flags.push(flag.clone());
        Ok(flag)
    }

    async fn read_by_key(&self, name: &str, enabled: Option<bool>) -> DomainResult<Vec<Flag>> {
        self.record_call();
        let filter = FlagFilter { name: Some(name.to_string()), enabled, ..FlagFilter::default() };
        self.read_by_filter(&filter).await
    }

    async fn read_by_filter(&self, filter: &FlagFilter) -> DomainResult<Vec<Flag>> {
        self.record_call();
        Ok(self.flags.lock().unwrap().iter().filter(|f| filter.matches(f)).cloned().collect())
    }

    async fn update(
        &self,
        name: &str,
        _environment: &str,
        update: FlagUpdate,
    ) -> DomainResult<UpdateResult> {
        self.record_call();
        if let Some(err) = self.update_error.lock().unwrap().clone() {
            return Err(err);
        }

        let mut updated_count = 0;
        for flag in self.flags.lock().unwrap().iter_mut().filter(|f| f.name == name) {
            flag.enabled = update.enabled;
            flag.description = update.description.clone();
            flag.updated_at = Some(update.toggled_at);
            flag.last_toggle = Some(update.toggled_at);
            updated_count += 1;
        }
        Ok(UpdateResult { updated_count })
    }

    async fn delete(&self, name: &str, environment: &str) -> DomainResult<DeleteResult> {
        self.record_call();
        let mut flags = self.flags.lock().unwrap();
        let before = flags.len();
        flags.retain(|f| !(f.name == name && f.environment == environment));
        Ok(DeleteResult { deleted_count: before - flags.len() })
    }
}

/// In-memory mock for `AuditWriter`.
#[derive(Default)]
pub struct InMemoryAuditWriter {
    records: Mutex<Vec<AuditRecord>>,
    failing: Mutex<Option<FlagStoreError>>,
}

impl InMemoryAuditWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A writer whose every append fails with `err`.
    pub fn failing(err: FlagStoreError) -> Self {
        Self { records: Mutex::default(), failing: Mutex::new(Some(err)) }
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditWriter for InMemoryAuditWriter {
    async fn append(&self, record: AuditRecord) -> DomainResult<()> {
        if let Some(err) = self.failing.lock().unwrap().clone() {
            return Err(err);
        }
        self.records.lock().unwrap().push(record);
        Ok(())
    }

    async fn history(&self, name: &str, environment: &str) -> DomainResult<Vec<AuditRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.name == name && r.environment == environment)
            .cloned()
            .collect())
    }
}
