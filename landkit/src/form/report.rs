//! Whole-payload validation outside the document.

use serde::Serialize;

use crate::form::FormData;
use crate::form::registry::{REQUIRED_MESSAGE, ValidatorRegistry, Validity};

/// One field that failed validation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct FieldError {
    /// Field name as submitted.
    pub field: String,
    /// Raw submitted value; empty for a missing required field.
    pub value: String,
    /// User-facing validation message.
    pub message: String,
}

impl FieldError {
    /// Format the error for human-readable output: `{field}: {message} [{value}]`.
    #[must_use]
    pub fn format_human_readable(&self) -> String {
        if self.value.is_empty() {
            format!("{}: {}", self.field, self.message)
        } else {
            format!("{}: {} [{}]", self.field, self.message, self.value)
        }
    }
}

/// Result of validating a payload.
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct PayloadReport {
    /// Fields checked against a rule or the required constraint.
    pub checked_fields: usize,
    /// Whether every checked field passed.
    pub ok: bool,
    pub field_errors: Vec<FieldError>,
    /// Submitted fields with no rule and no required constraint.
    pub unchecked_fields: Vec<String>,
}

impl PayloadReport {
    #[must_use]
    pub fn errors_count(&self) -> usize {
        self.field_errors.len()
    }
}

/// Validate every field of `data`, treating the names in `required` as
/// required. A required field absent from the payload counts as empty.
#[must_use]
pub fn validate_payload(
    registry: &ValidatorRegistry,
    data: &FormData,
    required: &[String],
) -> PayloadReport {
    let is_required = |name: &str| required.iter().any(|r| r == name);
    let mut checked_fields = 0;
    let mut field_errors = Vec::new();
    let mut unchecked_fields = Vec::new();

    for (name, value) in data.iter() {
        let field_required = is_required(name);
        if !field_required && registry.rule(name).is_none() {
            unchecked_fields.push(name.to_owned());
            continue;
        }
        checked_fields += 1;
        if let Validity::Invalid(message) = registry.validate(name, value, field_required) {
            field_errors.push(FieldError {
                field: name.to_owned(),
                value: value.to_owned(),
                message,
            });
        }
    }

    for name in required {
        if data.get(name).is_none() {
            checked_fields += 1;
            field_errors.push(FieldError {
                field: name.clone(),
                value: String::new(),
                message: REQUIRED_MESSAGE.to_owned(),
            });
        }
    }

    PayloadReport {
        checked_fields,
        ok: field_errors.is_empty(),
        field_errors,
        unchecked_fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_owned()).collect()
    }

    #[test]
    fn test_valid_payload() {
        let data: FormData = [
            ("name", "Jane Doe"),
            ("email", "jane@example.com"),
            ("phone", ""),
            ("newsletter", "yes"),
        ]
        .into_iter()
        .collect();
        let report = validate_payload(ValidatorRegistry::standard(), &data, &required(&["name", "email"]));
        assert!(report.ok);
        assert_eq!(report.checked_fields, 3);
        assert_eq!(report.unchecked_fields, vec!["newsletter".to_owned()]);
    }

    #[test]
    fn test_missing_required_and_bad_values() {
        let data: FormData = [("name", "J"), ("email", "not-an-email")].into_iter().collect();
        let report = validate_payload(
            ValidatorRegistry::standard(),
            &data,
            &required(&["name", "email", "message"]),
        );
        assert!(!report.ok);
        assert_eq!(report.errors_count(), 3);
        let missing = &report.field_errors[2];
        assert_eq!(missing.field, "message");
        assert_eq!(missing.message, REQUIRED_MESSAGE);
        assert_eq!(missing.format_human_readable(), "message: This field is required");
        assert_eq!(
            report.field_errors[1].format_human_readable(),
            "email: Please enter a valid email address [not-an-email]"
        );
    }
}
