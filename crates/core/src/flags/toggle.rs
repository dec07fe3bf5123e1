//! Toggle use case
//!
//! A toggle moves through `Received -> Validated -> Updated -> Audited ->
//! Completed`. Validation failures reject the request before any storage
//! access. A failed update fails the request. The audit append only follows
//! a storage-confirmed update and its failure never changes the outcome.

use std::sync::Arc;

use flagstore_domain::{now_millis, AuditRecord, Flag, FlagUpdate, Result, ToggleRequest};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::ports::{AuditWriter, FlagRepository};
use super::schemas;

/// What a completed toggle reports back
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleReceipt {
    /// Rows changed by the update; 0 when no flag has the requested name
    pub updated_count: usize,
    /// Stored flag after the update
    pub flag: Option<Flag>,
    /// Audit record built for this toggle, absent when nothing was updated
    pub audit: Option<AuditRecord>,
    /// Whether the audit record reached the audit store
    pub audit_persisted: bool,
}

/// Toggle orchestrator
pub struct ToggleService {
    flags: Arc<dyn FlagRepository>,
    audit: Arc<dyn AuditWriter>,
}

impl ToggleService {
    /// Create a new toggle service
    pub fn new(flags: Arc<dyn FlagRepository>, audit: Arc<dyn AuditWriter>) -> Self {
        Self { flags, audit }
    }

    /// Validate and apply a toggle payload
    ///
    /// # Errors
    /// - `Validation` when the payload misses `name`, `enabled`,
    ///   `environment` or `userName`
    /// - any classified storage error from the flag update
    #[instrument(skip(self, payload))]
    pub async fn toggle(&self, payload: &Value) -> Result<ToggleReceipt> {
        let request: ToggleRequest = schemas::validate(&schemas::toggle(), payload)?;
        self.apply(request).await
    }

    /// Apply an already validated toggle
    #[instrument(
        skip(self, request),
        fields(flag = %request.name, environment = %request.environment, enabled = request.enabled)
    )]
    pub async fn apply(&self, request: ToggleRequest) -> Result<ToggleReceipt> {
        let toggled_at = now_millis();
        let record = AuditRecord::for_toggle(
            request.name.clone(),
            request.enabled,
            request.user_name.clone(),
            request.environment.clone(),
            toggled_at,
        );

        let update = FlagUpdate {
            enabled: request.enabled,
            description: Some(
                request.description.clone().unwrap_or_else(|| record.children.clone()),
            ),
            toggled_at,
        };
        let result = self.flags.update(&request.name, &request.environment, update).await?;

        if result.updated_count == 0 {
            debug!("No flag matched; skipping audit");
            return Ok(ToggleReceipt {
                updated_count: 0,
                flag: None,
                audit: None,
                audit_persisted: false,
            });
        }

        let audit_persisted = match self.audit.append(record.clone()).await {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    flag = %request.name,
                    environment = %request.environment,
                    error = %err,
                    "Audit write failed; flag update stands"
                );
                false
            }
        };

        let flag = match self.flags.read_by_key(&request.name, None).await {
            Ok(flags) => flags.into_iter().next(),
            Err(err) => {
                warn!(flag = %request.name, error = %err, "Failed to reload toggled flag");
                None
            }
        };

        info!(user = %request.user_name, audit_persisted, "Flag toggled");

        Ok(ToggleReceipt {
            updated_count: result.updated_count,
            flag,
            audit: Some(record),
            audit_persisted,
        })
    }
}
