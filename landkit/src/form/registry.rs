//! Field validation rules.
//!
//! The registry maps a field's `name` attribute to the pattern its trimmed
//! value must match. Requiredness is not part of a rule: it comes from the
//! control's `required` attribute and is passed in by the caller.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Message for a required field whose trimmed value is empty.
pub const REQUIRED_MESSAGE: &str = "This field is required";

/// Pattern and user-facing message for one field.
#[derive(Debug)]
pub struct FieldRule {
    pub name: &'static str,
    pub pattern: Regex,
    pub message: &'static str,
}

/// Outcome of validating one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum Validity {
    Valid,
    Invalid(String),
}

impl Validity {
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// The error message, for invalid results.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Invalid(message) => Some(message),
        }
    }
}

/// Immutable set of field rules.
#[derive(Debug)]
pub struct ValidatorRegistry {
    rules: Vec<FieldRule>,
}

fn rule(name: &'static str, pattern: &str, message: &'static str) -> FieldRule {
    match Regex::new(pattern) {
        Ok(pattern) => FieldRule {
            name,
            pattern,
            message,
        },
        Err(err) => panic!("Invalid {name} validation regex: {err}"),
    }
}

static STANDARD: LazyLock<ValidatorRegistry> = LazyLock::new(|| ValidatorRegistry {
    rules: vec![
        rule(
            "name",
            r"^[a-zA-Z\s'-]{2,50}$",
            "Please enter a valid name (2-50 characters)",
        ),
        rule(
            "email",
            r"^[^\s@]+@[^\s@]+\.[^\s@]+$",
            "Please enter a valid email address",
        ),
        rule(
            "phone",
            r"^[0-9\s\-+()]{10,}$",
            "Please enter a valid phone number (at least 10 digits)",
        ),
        rule(
            "subject",
            r"^.{3,100}$",
            "Subject must be between 3 and 100 characters",
        ),
        rule(
            "message",
            r"^[\s\S]{10,1000}$",
            "Message must be between 10 and 1000 characters",
        ),
    ],
});

impl ValidatorRegistry {
    /// The contact-form rules, compiled once.
    #[must_use]
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    #[must_use]
    pub fn rule(&self, field: &str) -> Option<&FieldRule> {
        self.rules.iter().find(|r| r.name == field)
    }

    /// Field names with a rule, in registry order.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.name)
    }

    /// Validate `value` for the field called `field`.
    ///
    /// The value is trimmed first. An empty value is only invalid when the
    /// field is required; fields without a rule accept anything non-empty.
    #[must_use]
    pub fn validate(&self, field: &str, value: &str, required: bool) -> Validity {
        let value = value.trim();
        if value.is_empty() {
            return if required {
                Validity::Invalid(REQUIRED_MESSAGE.to_owned())
            } else {
                Validity::Valid
            };
        }
        match self.rule(field) {
            Some(rule) if !rule.pattern.is_match(value) => {
                Validity::Invalid(rule.message.to_owned())
            }
            _ => Validity::Valid,
        }
    }
}
