//! Declarative payload schemas
//!
//! An [`OperationSchema`] lists the fields an operation accepts, their JSON
//! types and whether they are required. Validation is structural only: it
//! never looks at stored data. It fails fast on the first violated field and
//! either yields the whole payload or nothing.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::validators::StringValidator;
use super::{ValidationContext, ValidationError, ValidationResult, Validator};

/// Pseudo-field reported when the payload itself is not an object
pub const PAYLOAD_FIELD: &str = "_payload";

/// JSON type a field must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Boolean,
}

impl FieldType {
    fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Boolean => value.is_boolean(),
        }
    }
}

/// One declared field of an operation schema
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    string_rules: Option<StringValidator>,
}

impl FieldSpec {
    /// Required field of the given type
    pub fn required(name: &'static str, field_type: FieldType) -> Self {
        Self { name, field_type, required: true, string_rules: None }
    }

    /// Optional field of the given type
    pub fn optional(name: &'static str, field_type: FieldType) -> Self {
        Self { name, field_type, required: false, string_rules: None }
    }

    /// Reject empty (or whitespace-only) strings for this field
    pub fn non_empty(mut self) -> Self {
        self.string_rules = Some(StringValidator::new().not_empty());
        self
    }
}

/// Schema declared by one operation
#[derive(Debug, Clone)]
pub struct OperationSchema {
    operation: &'static str,
    fields: Vec<FieldSpec>,
    deny_unknown_fields: bool,
}

impl OperationSchema {
    /// Start an empty schema for `operation`
    pub fn new(operation: &'static str) -> Self {
        Self { operation, fields: Vec::new(), deny_unknown_fields: false }
    }

    /// Declare a field; fields are checked in declaration order
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Reject payload keys that the schema does not declare
    pub fn deny_unknown_fields(mut self) -> Self {
        self.deny_unknown_fields = true;
        self
    }

    /// Operation name
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Declared fields
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Validate a payload against this schema
    ///
    /// `null` is treated the same as an absent field.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] describing the first violated field.
    pub fn validate(&self, payload: &Value) -> ValidationResult<ValidatedPayload> {
        let context = ValidationContext::for_operation(self.operation).stop_on_first_error();

        let Some(object) = payload.as_object() else {
            return Err(ValidationError::field(PAYLOAD_FIELD, "must be a JSON object")
                .with_context(context));
        };

        let mut validator = Validator::with_context(context);
        let mut accepted = Map::new();

        for spec in &self.fields {
            if validator.should_short_circuit() {
                break;
            }

            match object.get(spec.name).filter(|v| !v.is_null()) {
                None if spec.required => {
                    validator.add_coded_error(spec.name, "is required", Some("required"));
                }
                None => {}
                Some(value) if !spec.field_type.matches(value) => {
                    validator.add_coded_error(
                        spec.name,
                        format!("must be a {}", spec.field_type.name()),
                        Some("type"),
                    );
                }
                Some(value) => {
                    if let (Some(rules), Some(text)) = (&spec.string_rules, value.as_str()) {
                        validator.validate_field(spec.name, text, rules);
                    }
                    accepted.insert(spec.name.to_string(), value.clone());
                }
            }
        }

        if self.deny_unknown_fields && !validator.should_short_circuit() {
            if let Some(unknown) =
                object.keys().find(|key| !self.fields.iter().any(|spec| spec.name == key.as_str()))
            {
                validator.add_coded_error(unknown.clone(), "is not allowed", Some("unknown"));
            }
        }

        validator.finalize()?;

        Ok(ValidatedPayload { operation: self.operation, fields: accepted })
    }
}

/// A payload that passed its operation schema
///
/// Holds only the declared fields that were present.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPayload {
    operation: &'static str,
    fields: Map<String, Value>,
}

impl ValidatedPayload {
    /// Operation the payload was validated for
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Deserialize the accepted fields into a typed request
    ///
    /// # Errors
    /// Returns a [`ValidationError`] if the schema and the target type
    /// disagree.
    pub fn into_typed<T: DeserializeOwned>(self) -> ValidationResult<T> {
        let operation = self.operation;
        serde_json::from_value(Value::Object(self.fields)).map_err(|e| {
            ValidationError::field(PAYLOAD_FIELD, e.to_string())
                .with_context(ValidationContext::for_operation(operation))
        })
    }
}
