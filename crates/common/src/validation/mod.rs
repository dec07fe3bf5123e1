// Validation Module - structural payload validation
use std::fmt;

mod schema;
mod validators;

pub use schema::{FieldSpec, FieldType, OperationSchema, ValidatedPayload};
pub use validators::{FieldValidator, StringValidator};

/// Type alias for validation results
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error with detailed field-level errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
    pub context: Option<ValidationContext>,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new() -> Self {
        Self { errors: Vec::new(), context: None }
    }

    /// Create with a single field error
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut err = Self::new();
        err.add_field_error(field, message);
        err
    }

    /// Add a field-level error
    pub fn add_field_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Add a field error with code
    pub fn add_error_with_code(
        &mut self,
        field: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
    ) {
        self.errors.push(FieldError::new(field, message).with_code(code));
    }

    /// Set validation context
    pub fn with_context(mut self, context: ValidationContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get error count
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// The first violated field, if any
    pub fn first(&self) -> Option<&FieldError> {
        self.errors.first()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [] => write!(f, "Validation error with no specific field errors"),
            [only] => write!(f, "Validation failed: {} {}", only.field, only.message),
            many => {
                write!(f, "Validation failed with {} errors: ", many.len())?;
                for (i, error) in many.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}: {}", error.field, error.message)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Individual field error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub code: Option<String>,
}

impl FieldError {
    /// Create a new field error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into(), code: None }
    }

    /// Set error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Validation context for tracking validation state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationContext {
    /// Operation the payload was validated for
    pub operation: Option<String>,
    pub stop_on_first: bool,
}

impl ValidationContext {
    /// Context for a named operation
    pub fn for_operation(operation: impl Into<String>) -> Self {
        Self { operation: Some(operation.into()), ..Self::default() }
    }

    /// Stop on first error
    pub fn stop_on_first_error(mut self) -> Self {
        self.stop_on_first = true;
        self
    }
}

/// Main validator struct for orchestrating validations
pub struct Validator {
    errors: ValidationError,
    context: ValidationContext,
    stopped: bool,
}

impl Validator {
    /// Create with context
    pub fn with_context(context: ValidationContext) -> Self {
        Self { errors: ValidationError::new(), context, stopped: false }
    }

    /// Whether further checks are skipped because the first error was hit
    pub fn should_short_circuit(&self) -> bool {
        self.context.stop_on_first && self.stopped
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.add_coded_error(field, message, None::<String>);
    }

    /// Add an error carrying a machine-readable code
    pub fn add_coded_error(
        &mut self,
        field: impl Into<String>,
        message: impl Into<String>,
        code: Option<impl Into<String>>,
    ) {
        if self.should_short_circuit() {
            return;
        }

        match code {
            Some(code) => self.errors.add_error_with_code(field, message, code),
            None => self.errors.add_field_error(field, message),
        }

        if self.context.stop_on_first {
            self.stopped = true;
        }
    }

    /// Validate a field with a specific validator
    pub fn validate_field<T, V>(&mut self, field: &str, value: &T, validator: &V)
    where
        T: ?Sized,
        V: FieldValidator<T> + ?Sized,
    {
        if self.should_short_circuit() {
            return;
        }

        if let Err(msg) = validator.validate(value) {
            self.add_error(field, msg);
        }
    }

    /// Finalize and return result
    pub fn finalize(self) -> ValidationResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors.with_context(self.context))
        }
    }
}
