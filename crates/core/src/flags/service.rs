//! Flag service - create, read, delete and evaluate flags

use std::sync::Arc;

use flagstore_domain::{
    AuditRecord, DeleteRequest, DeleteResult, Flag, FlagFilter, FlagKeyQuery, NewFlag, Result,
};
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::ports::{AuditWriter, FlagRepository};
use super::schemas;

/// Flag operations other than toggling
pub struct FlagService {
    flags: Arc<dyn FlagRepository>,
    audit: Arc<dyn AuditWriter>,
}

impl FlagService {
    /// Create a new flag service
    pub fn new(flags: Arc<dyn FlagRepository>, audit: Arc<dyn AuditWriter>) -> Self {
        Self { flags, audit }
    }

    /// Create a flag from a payload
    ///
    /// # Errors
    /// `Validation` for a malformed payload, otherwise the repository's
    /// classified error (`DuplicateKey`, `NullConstraint`, ...).
    #[instrument(skip(self, payload))]
    pub async fn create(&self, payload: &Value) -> Result<Flag> {
        let new_flag: NewFlag = schemas::validate(&schemas::create(), payload)?;
        let flag = self.flags.create(new_flag).await?;
        info!(flag = %flag.name, environment = %flag.environment, "Flag created");
        Ok(flag)
    }

    /// Read flags matching the optional filters in `payload`
    #[instrument(skip(self, payload))]
    pub async fn read(&self, payload: &Value) -> Result<Vec<Flag>> {
        let filter: FlagFilter = schemas::validate(&schemas::read_filter(), payload)?;
        self.flags.read_by_filter(&filter).await
    }

    /// Read flags by exact name, optionally narrowed by state
    #[instrument(skip(self, payload))]
    pub async fn read_by_key(&self, payload: &Value) -> Result<Vec<Flag>> {
        let query: FlagKeyQuery = schemas::validate(&schemas::read_key(), payload)?;
        self.flags.read_by_key(&query.name, query.enabled).await
    }

    /// Delete a flag from one environment; a missing flag deletes nothing
    #[instrument(skip(self, payload))]
    pub async fn delete(&self, payload: &Value) -> Result<DeleteResult> {
        let request: DeleteRequest = schemas::validate(&schemas::delete(), payload)?;
        let result = self.flags.delete(&request.name, &request.environment).await?;
        info!(
            flag = %request.name,
            environment = %request.environment,
            deleted = result.deleted_count,
            "Flag delete applied"
        );
        Ok(result)
    }

    /// Evaluate a flag for a client service
    ///
    /// Returns `default` when the flag does not exist in `environment`.
    #[instrument(skip(self))]
    pub async fn is_enabled(&self, name: &str, environment: &str, default: bool) -> Result<bool> {
        let filter = FlagFilter::new().name(name).environment(environment);
        let flag = self.flags.read_by_filter(&filter).await?.into_iter().next();

        match flag {
            Some(flag) => Ok(flag.enabled),
            None => {
                debug!("Flag not found; using default");
                Ok(default)
            }
        }
    }

    /// Toggle history of one flag in append order
    pub async fn history(&self, name: &str, environment: &str) -> Result<Vec<AuditRecord>> {
        self.audit.history(name, environment).await
    }
}
