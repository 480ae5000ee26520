//! Shared helpers for validating user input before it reaches the stores.
//!
//! Validation failures are never errors. They are collected as a list of
//! [FieldError]s so every problem with a form can be reported at once, next
//! to the field it belongs to.

use std::fmt::Display;

use email_address::EmailAddress;

/// A problem with a single form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The name of the field, e.g. "email".
    pub field: &'static str,
    /// A message that can be shown to the user as is.
    pub message: String,
}

impl FieldError {
    /// Create a new field error.
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    /// The error for a required field that was left empty, e.g. "Amount is required".
    pub fn required(field: &'static str) -> Self {
        Self::new(field, format!("{} is required", capitalise_first_char(field)))
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Whether `value` is missing or only whitespace.
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Check an email field, pushing at most one error onto `errors`.
pub(crate) fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    if is_blank(email) {
        errors.push(FieldError::required("email"));
    } else if !EmailAddress::is_valid(email.trim()) {
        errors.push(FieldError::new("email", "Please enter a valid email address"));
    }
}

/// From https://crates.io/crates/capitalize
pub fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}

#[cfg(test)]
mod tests {
    use super::{FieldError, capitalise_first_char, check_email};

    #[test]
    fn required_message_capitalises_field_name() {
        assert_eq!(FieldError::required("amount").message, "Amount is required");
    }

    #[test]
    fn capitalise_handles_empty_string() {
        assert_eq!(capitalise_first_char(""), "");
    }

    #[test]
    fn check_email_rejects_blank_and_malformed() {
        let mut errors = Vec::new();
        check_email("  ", &mut errors);
        check_email("not-an-email", &mut errors);
        check_email("a@x.com", &mut errors);

        assert_eq!(
            errors,
            vec![
                FieldError::required("email"),
                FieldError::new("email", "Please enter a valid email address"),
            ]
        );
    }
}
