//! Core-facing interface consumed by the routing layer
//!
//! Takes already-parsed JSON payloads and answers with an [`Outcome`]. No
//! error escapes as anything other than its mapped outcome category.

use std::sync::Arc;

use flagstore_domain::{AuditRecord, DeleteResult, Flag, FlagStoreError};
use serde_json::Value;
use tracing::{error, warn};

use crate::flags::ports::{AuditWriter, FlagRepository};
use crate::flags::service::FlagService;
use crate::flags::toggle::{ToggleReceipt, ToggleService};
use crate::outcome::{Outcome, OutcomeStatus};

/// Facade over the flag service and the toggle orchestrator
pub struct FlagControlPlane {
    flags: FlagService,
    toggles: ToggleService,
}

impl FlagControlPlane {
    /// Create a control plane over the given ports
    pub fn new(flags: Arc<dyn FlagRepository>, audit: Arc<dyn AuditWriter>) -> Self {
        Self {
            flags: FlagService::new(Arc::clone(&flags), Arc::clone(&audit)),
            toggles: ToggleService::new(flags, audit),
        }
    }

    /// Underlying service, for evaluation calls
    pub fn service(&self) -> &FlagService {
        &self.flags
    }

    /// `Created` with the stored flag, `Conflict` on a duplicate name
    pub async fn create_flag(&self, payload: &Value) -> Outcome<Flag> {
        match self.flags.create(payload).await {
            Ok(flag) => Outcome::Created(flag),
            Err(err) => failed("create", &err),
        }
    }

    pub async fn read_flags(&self, filter: &Value) -> Outcome<Vec<Flag>> {
        respond("read", self.flags.read(filter).await)
    }

    pub async fn read_flag(&self, payload: &Value) -> Outcome<Vec<Flag>> {
        respond("read", self.flags.read_by_key(payload).await)
    }

    /// `Ok` whenever the update ran, even if the audit write failed
    pub async fn toggle_flag(&self, payload: &Value) -> Outcome<ToggleReceipt> {
        respond("toggle", self.toggles.toggle(payload).await)
    }

    /// Deleting a missing pair is `Ok` with a zero count
    pub async fn delete_flag(&self, payload: &Value) -> Outcome<DeleteResult> {
        respond("delete", self.flags.delete(payload).await)
    }

    pub async fn flag_history(&self, name: &str, environment: &str) -> Outcome<Vec<AuditRecord>> {
        respond("history", self.flags.history(name, environment).await)
    }
}

fn respond<T>(operation: &'static str, result: flagstore_domain::Result<T>) -> Outcome<T> {
    match result {
        Ok(value) => Outcome::Ok(value),
        Err(err) => failed(operation, &err),
    }
}

fn failed<T>(operation: &'static str, err: &FlagStoreError) -> Outcome<T> {
    let outcome = Outcome::from_error(err);
    if outcome.status() == OutcomeStatus::InternalError {
        error!(operation, kind = err.label(), error = %err, "Flag operation failed");
    } else {
        warn!(operation, kind = err.label(), error = %err, "Flag operation rejected");
    }
    outcome
}
