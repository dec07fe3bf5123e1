//! Caller-facing operation outcomes
//!
//! Every [`FlagStoreError`] kind maps to exactly one [`OutcomeStatus`], and
//! that mapping is the same for every operation.

use flagstore_domain::FlagStoreError;
use serde::Serialize;

/// Outcome category, independent of the payload type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OutcomeStatus {
    Ok,
    Created,
    Conflict,
    BadInput,
    InternalError,
}

impl OutcomeStatus {
    /// Status code the routing layer answers with
    pub fn http_status(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Created => 201,
            Self::Conflict => 409,
            Self::BadInput => 400,
            Self::InternalError => 500,
        }
    }

    /// Category for a classified error
    pub fn for_error(err: &FlagStoreError) -> Self {
        match err {
            FlagStoreError::DuplicateKey(_) => Self::Conflict,
            FlagStoreError::Validation { .. } | FlagStoreError::NullConstraint { .. } => {
                Self::BadInput
            }
            FlagStoreError::PoolExhausted(_)
            | FlagStoreError::StorageUnavailable(_)
            | FlagStoreError::Database(_)
            | FlagStoreError::Config(_)
            | FlagStoreError::Internal(_) => Self::InternalError,
        }
    }
}

/// Result of one control-plane operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "body", rename_all = "camelCase")]
pub enum Outcome<T> {
    Ok(T),
    Created(T),
    Conflict { message: String },
    BadInput { field: Option<String>, message: String },
    InternalError { message: String },
}

impl<T> Outcome<T> {
    /// Translate a classified error into its outcome
    pub fn from_error(err: &FlagStoreError) -> Self {
        let message = err.to_string();
        match OutcomeStatus::for_error(err) {
            OutcomeStatus::Conflict => Self::Conflict { message },
            OutcomeStatus::BadInput => Self::BadInput { field: offending_field(err), message },
            _ => Self::InternalError { message },
        }
    }

    /// Status category of this outcome
    pub fn status(&self) -> OutcomeStatus {
        match self {
            Self::Ok(_) => OutcomeStatus::Ok,
            Self::Created(_) => OutcomeStatus::Created,
            Self::Conflict { .. } => OutcomeStatus::Conflict,
            Self::BadInput { .. } => OutcomeStatus::BadInput,
            Self::InternalError { .. } => OutcomeStatus::InternalError,
        }
    }

    /// HTTP status code a routing layer should answer with
    pub fn http_status(&self) -> u16 {
        self.status().http_status()
    }

    /// Whether the operation succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ok(_) | Self::Created(_))
    }

    /// Success payload, if any
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Ok(value) | Self::Created(value) => Some(value),
            _ => None,
        }
    }
}

fn offending_field(err: &FlagStoreError) -> Option<String> {
    match err {
        FlagStoreError::Validation { field, .. } => Some(field.clone()),
        FlagStoreError::NullConstraint { column } => Some(column.clone()),
        _ => None,
    }
}
