//! Validated request payloads, one per operation
//!
//! Field names follow the wire payloads (`userName`).

use serde::{Deserialize, Serialize};

/// Lookup by exact name, optionally narrowed by state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagKeyQuery {
    pub name: String,
    #[serde(default)]
    pub enabled: Option<bool>,
}

/// Toggle a flag on behalf of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleRequest {
    pub name: String,
    pub enabled: bool,
    pub environment: String,
    pub user_name: String,
    /// Written over the stored description; the audit summary is used when absent
    #[serde(default)]
    pub description: Option<String>,
}

/// Remove a flag from one environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequest {
    pub name: String,
    pub environment: String,
}
