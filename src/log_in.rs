//! The log-in form and its validation rules.
//! The user module handles checking credentials and storing the session.

use crate::form::{FieldError, check_email, is_blank};

/// The message shown for any failed log in.
///
/// Unknown emails and wrong passwords get the same message.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials";

/// The raw input from the log-in form.
#[derive(Debug, Clone, Default)]
pub struct LogInForm {
    /// The email the user registered with.
    pub email: String,
    /// The user's password.
    pub password: String,
}

impl LogInForm {
    /// Check that both fields are filled in and the email looks like an email.
    ///
    /// Returns the trimmed email on success.
    ///
    /// # Errors
    ///
    /// Returns one [FieldError] per invalid field.
    pub fn validate(&self) -> Result<&str, Vec<FieldError>> {
        let mut errors = Vec::new();

        check_email(&self.email, &mut errors);

        if self.password.is_empty() {
            errors.push(FieldError::required("password"));
        }

        if errors.is_empty() {
            Ok(self.email.trim())
        } else {
            Err(errors)
        }
    }
}
