//! Flag types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A named, environment-scoped boolean switch plus metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flag {
    pub name: String,
    pub enabled: bool,
    /// Grouping label, not part of the key
    pub project: String,
    pub environment: String,
    pub description: Option<String>,
    /// Set once at creation
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub last_toggle: Option<DateTime<Utc>>,
}

/// Fields required to create a flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFlag {
    pub name: String,
    pub enabled: bool,
    pub project: String,
    pub environment: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewFlag {
    /// Create a new flag request without a description
    pub fn new(
        name: impl Into<String>,
        enabled: bool,
        project: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            enabled,
            project: project.into(),
            environment: environment.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Materialize the stored row for this request
    pub fn into_flag(self, created_at: DateTime<Utc>) -> Flag {
        Flag {
            name: self.name,
            enabled: self.enabled,
            project: self.project,
            environment: self.environment,
            description: self.description,
            created_at,
            updated_at: None,
            last_toggle: None,
        }
    }
}

/// Optional filter set for flag reads
///
/// Absent fields add no condition. An empty filter matches every flag.
/// Empty strings in a payload count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub project: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub environment: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|value| !value.is_empty()))
}

impl FlagFilter {
    /// Create an empty filter
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Whether no field is set
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.enabled.is_none()
            && self.project.is_none()
            && self.environment.is_none()
    }

    /// Whether a flag satisfies every present condition
    pub fn matches(&self, flag: &Flag) -> bool {
        self.name.as_deref().map_or(true, |name| flag.name == name)
            && self.enabled.map_or(true, |enabled| flag.enabled == enabled)
            && self.project.as_deref().map_or(true, |project| flag.project == project)
            && self.environment.as_deref().map_or(true, |env| flag.environment == env)
    }
}

/// Columns written by a toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagUpdate {
    pub enabled: bool,
    pub description: Option<String>,
    /// Written to both `updated_at` and `last_toggle`
    pub toggled_at: DateTime<Utc>,
}

/// Rows affected by an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub updated_count: usize,
}

/// Rows affected by a delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub deleted_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Flag {
        NewFlag::new("f1", true, "api", "prod").into_flag(Utc::now())
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = FlagFilter::new();
        assert!(filter.is_empty());
        assert!(filter.matches(&sample()));
    }

    #[test]
    fn filter_checks_only_present_fields() {
        let flag = sample();
        assert!(FlagFilter::new().project("api").matches(&flag));
        assert!(FlagFilter::new().environment("prod").enabled(true).matches(&flag));
        assert!(!FlagFilter::new().name("f1").environment("local").matches(&flag));
    }

    #[test]
    fn empty_strings_in_payload_add_no_condition() {
        let filter: FlagFilter =
            serde_json::from_value(serde_json::json!({"project": "", "environment": "prod"}))
                .unwrap();
        assert_eq!(filter, FlagFilter::new().environment("prod"));
    }

    #[test]
    fn flag_serializes_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("lastToggle").is_some());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn new_flag_has_no_toggle_history() {
        let flag = NewFlag::new("f1", false, "api", "prod").with_description("d").into_flag(Utc::now());
        assert_eq!(flag.description.as_deref(), Some("d"));
        assert!(flag.updated_at.is_none());
        assert!(flag.last_toggle.is_none());
    }
}
