//! Per-field validation errors

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// One failed check on a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Message shown to the user
    pub message: String,
    /// Machine-readable kind (`required`, `invalid`, `max_length`, `invalid_choice`)
    pub code: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Errors of a form, grouped by field name
///
/// ```rust
/// use profiles_htmx::forms::ValidationErrors;
///
/// let mut errors = ValidationErrors::new();
/// errors.add("display_name", "This field is required.", "required");
///
/// assert!(errors.has_field_error("display_name"));
/// assert_eq!(errors.count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<FieldError>>);

impl ValidationErrors {
    /// No errors
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` against `field`
    pub fn add(&mut self, field: &str, message: impl Into<String>, code: &'static str) {
        self.0.entry(field.to_string()).or_default().push(FieldError {
            message: message.into(),
            code,
        });
    }

    /// Whether any field failed
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.0.is_empty()
    }

    /// Whether `field` failed
    #[must_use]
    pub fn has_field_error(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Errors of `field`, empty when it passed
    #[must_use]
    pub fn for_field(&self, field: &str) -> &[FieldError] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    /// Total number of errors
    #[must_use]
    pub fn count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_accumulate_per_field() {
        let mut errors = ValidationErrors::new();
        assert!(!errors.has_errors());

        errors.add("email", "This field is required.", "required");
        errors.add("email", "Enter a valid email address.", "invalid");

        assert!(errors.has_field_error("email"));
        assert!(errors.for_field("bio").is_empty());
        assert_eq!(errors.for_field("email")[1].code, "invalid");
        assert_eq!(errors.count(), 2);
    }

    #[test]
    fn test_serializes_as_map_of_lists() {
        let mut errors = ValidationErrors::new();
        errors.add("age", "Enter a whole number.", "invalid");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["age"][0]["message"], "Enter a whole number.");
        assert_eq!(json["age"][0]["code"], "invalid");
    }
}
