//! Dynamic WHERE clause construction
//!
//! Conditions are appended as `(column, value)` pairs in order. Placeholders
//! are numbered from each pair's position when the clause is rendered, so
//! leaving out an early filter never shifts a later value onto the wrong
//! placeholder. Values are always bound, never spliced into the SQL text.

use flagstore_domain::FlagFilter;
use rusqlite::types::Value as SqlValue;

/// Ordered list of equality conditions ANDed together
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereClauseBuilder {
    conditions: Vec<(&'static str, SqlValue)>,
}

/// A rendered clause and the values bound to its placeholders, in order
#[derive(Debug, Clone, PartialEq)]
pub struct FilterQuery {
    /// Empty, or ` WHERE ...` with a leading space
    pub clause: String,
    pub params: Vec<SqlValue>,
}

impl WhereClauseBuilder {
    /// Create a builder with no conditions
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `column = ?` bound to `value`.
    ///
    /// `column` is trusted SQL; only the value is user data.
    pub fn push(mut self, column: &'static str, value: impl Into<SqlValue>) -> Self {
        self.conditions.push((column, value.into()));
        self
    }

    /// Append the condition only when a value is present
    pub fn push_opt<T: Into<SqlValue>>(self, column: &'static str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.push(column, value),
            None => self,
        }
    }

    /// Number of conditions added so far
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Whether no condition was added
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Render ` WHERE a = ?1 AND b = ?2 ...` with values in placeholder order
    pub fn render(self) -> FilterQuery {
        if self.conditions.is_empty() {
            return FilterQuery { clause: String::new(), params: Vec::new() };
        }

        let mut predicates = Vec::with_capacity(self.conditions.len());
        let mut params = Vec::with_capacity(self.conditions.len());

        for (index, (column, value)) in self.conditions.into_iter().enumerate() {
            predicates.push(format!("{column} = ?{}", index + 1));
            params.push(value);
        }

        FilterQuery { clause: format!(" WHERE {}", predicates.join(" AND ")), params }
    }
}

impl From<&FlagFilter> for WhereClauseBuilder {
    fn from(filter: &FlagFilter) -> Self {
        Self::new()
            .push_opt("name", filter.name.clone())
            .push_opt("enabled", filter.enabled)
            .push_opt("project", filter.project.clone())
            .push_opt("environment", filter.environment.clone())
    }
}
