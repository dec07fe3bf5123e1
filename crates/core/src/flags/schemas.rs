//! Payload schemas for each flag operation
//!
//! Validation runs before any repository call, so a rejected payload never
//! touches a connection pool.

use flagstore_common::validation::{
    FieldSpec, FieldType, OperationSchema, ValidatedPayload, ValidationError,
};
use flagstore_domain::{FlagStoreError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// `create`: every stored column except the description is required
pub fn create() -> OperationSchema {
    OperationSchema::new("create")
        .field(FieldSpec::required("name", FieldType::String).non_empty())
        .field(FieldSpec::required("enabled", FieldType::Boolean))
        .field(FieldSpec::required("project", FieldType::String).non_empty())
        .field(FieldSpec::required("environment", FieldType::String).non_empty())
        .field(FieldSpec::optional("description", FieldType::String))
}

/// `read` by exact key
pub fn read_key() -> OperationSchema {
    OperationSchema::new("read")
        .field(FieldSpec::required("name", FieldType::String).non_empty())
        .field(FieldSpec::optional("enabled", FieldType::Boolean))
}

/// `read` by filter: every field optional, types still checked
pub fn read_filter() -> OperationSchema {
    OperationSchema::new("read")
        .field(FieldSpec::optional("name", FieldType::String))
        .field(FieldSpec::optional("enabled", FieldType::Boolean))
        .field(FieldSpec::optional("project", FieldType::String))
        .field(FieldSpec::optional("environment", FieldType::String))
}

/// `toggle`: the audit record needs the acting user
pub fn toggle() -> OperationSchema {
    OperationSchema::new("toggle")
        .field(FieldSpec::required("name", FieldType::String).non_empty())
        .field(FieldSpec::required("enabled", FieldType::Boolean))
        .field(FieldSpec::required("environment", FieldType::String).non_empty())
        .field(FieldSpec::required("userName", FieldType::String).non_empty())
        .field(FieldSpec::optional("description", FieldType::String))
}

/// `delete` by `(name, environment)`; no other keys are accepted
pub fn delete() -> OperationSchema {
    OperationSchema::new("delete")
        .field(FieldSpec::required("name", FieldType::String).non_empty())
        .field(FieldSpec::required("environment", FieldType::String).non_empty())
        .deny_unknown_fields()
}

/// Validate `payload` and deserialize it into the operation's request type
///
/// # Errors
/// Returns [`FlagStoreError::Validation`] naming the first violated field.
pub fn validate<T: DeserializeOwned>(schema: &OperationSchema, payload: &Value) -> Result<T> {
    schema
        .validate(payload)
        .and_then(ValidatedPayload::into_typed)
        .map_err(validation_failure)
}

fn validation_failure(err: ValidationError) -> FlagStoreError {
    match err.first() {
        Some(first) => FlagStoreError::validation(first.field.clone(), first.message.clone()),
        None => FlagStoreError::validation("_payload", "is invalid"),
    }
}

#[cfg(test)]
mod tests {
    use flagstore_domain::{DeleteRequest, FlagFilter, NewFlag, ToggleRequest};
    use serde_json::json;

    use super::*;

    #[test]
    fn create_requires_enabled() {
        let err = validate::<NewFlag>(
            &create(),
            &json!({"name": "f1", "project": "api", "environment": "prod"}),
        )
        .unwrap_err();
        assert_eq!(err, FlagStoreError::validation("enabled", "is required"));
    }

    #[test]
    fn create_accepts_optional_description() {
        let flag: NewFlag = validate(
            &create(),
            &json!({"name": "f1", "enabled": true, "project": "api", "environment": "prod"}),
        )
        .unwrap();
        assert_eq!(flag.project, "api");
        assert!(flag.description.is_none());
    }

    #[test]
    fn toggle_requires_user_name() {
        let err = validate::<ToggleRequest>(
            &toggle(),
            &json!({"name": "f1", "enabled": true, "environment": "prod"}),
        )
        .unwrap_err();
        assert_eq!(err, FlagStoreError::validation("userName", "is required"));
    }

    #[test]
    fn filter_rejects_wrong_type() {
        let err = validate::<FlagFilter>(&read_filter(), &json!({"enabled": "yes"})).unwrap_err();
        assert_eq!(err, FlagStoreError::validation("enabled", "must be a boolean"));
    }

    #[test]
    fn empty_filter_is_valid() {
        let filter: FlagFilter = validate(&read_filter(), &json!({})).unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn delete_rejects_undeclared_keys() {
        let err = validate::<DeleteRequest>(
            &delete(),
            &json!({"name": "f1", "environment": "prod", "project": "api"}),
        )
        .unwrap_err();
        assert_eq!(err, FlagStoreError::validation("project", "is not allowed"));
    }

    #[test]
    fn filter_ignores_empty_strings() {
        let filter: FlagFilter =
            validate(&read_filter(), &json!({"project": "", "enabled": true})).unwrap();
        assert_eq!(filter, FlagFilter::new().enabled(true));
    }

    #[test]
    fn delete_rejects_blank_environment() {
        let err =
            validate::<DeleteRequest>(&delete(), &json!({"name": "f1", "environment": ""}))
                .unwrap_err();
        assert_eq!(err, FlagStoreError::validation("environment", "cannot be empty"));
    }
}
