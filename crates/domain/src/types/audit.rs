//! Audit trail types

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{AUDIT_COLOR, AUDIT_DOT};

/// Immutable log entry describing one toggle
///
/// References a flag by `name` + `environment` without a structural link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub name: String,
    /// Post-toggle value
    pub enabled: bool,
    pub user_name: String,
    pub color: String,
    /// Human-readable summary
    pub children: String,
    pub dot: String,
    pub environment: String,
    pub audit_date: DateTime<Utc>,
}

impl AuditRecord {
    /// Build the record for a confirmed toggle
    pub fn for_toggle(
        name: impl Into<String>,
        enabled: bool,
        user_name: impl Into<String>,
        environment: impl Into<String>,
        audit_date: DateTime<Utc>,
    ) -> Self {
        let name = name.into();
        let user_name = user_name.into();
        let children = toggle_summary(&name, enabled, &user_name, audit_date);

        Self {
            name,
            enabled,
            user_name,
            color: AUDIT_COLOR.to_string(),
            children,
            dot: AUDIT_DOT.to_string(),
            environment: environment.into(),
            audit_date,
        }
    }
}

/// Summary text stored in [`AuditRecord::children`]
pub fn toggle_summary(name: &str, enabled: bool, user_name: &str, at: DateTime<Utc>) -> String {
    format!(
        "{name} flag set as {enabled} by user {user_name} at {}",
        at.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}
