// Field Validators - Reusable validation components

/// Trait for field validators
pub trait FieldValidator<T: ?Sized> {
    /// Validate a field value
    fn validate(&self, value: &T) -> Result<(), String>;
}

/// String validator rejecting empty or whitespace-only values
#[derive(Debug, Clone, Default)]
pub struct StringValidator {
    not_empty: bool,
}

impl StringValidator {
    /// Create a new string validator
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a non-empty string once surrounding whitespace is trimmed
    pub fn not_empty(mut self) -> Self {
        self.not_empty = true;
        self
    }
}

impl FieldValidator<str> for StringValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        if self.not_empty && value.trim().is_empty() {
            return Err("cannot be empty".to_string());
        }

        Ok(())
    }
}
