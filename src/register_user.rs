//! The registration form and its validation rules.

use crate::{
    form::{FieldError, check_email, is_blank},
    user::NewUser,
};

/// The minimum number of characters a password must have.
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// The raw input from the registration form.
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: String,
    /// The chosen password.
    pub password: String,
    /// The chosen password, typed a second time.
    pub confirm_password: String,
}

impl RegisterForm {
    /// Check every field and turn the form into a user that can be registered.
    ///
    /// Names and emails are trimmed, passwords are kept exactly as typed.
    ///
    /// # Errors
    ///
    /// Returns one [FieldError] per invalid field.
    pub fn validate(self) -> Result<NewUser, Vec<FieldError>> {
        let mut errors = Vec::new();

        if is_blank(&self.name) {
            errors.push(FieldError::required("name"));
        }

        check_email(&self.email, &mut errors);

        if self.password.is_empty() {
            errors.push(FieldError::required("password"));
        } else if self.password.chars().count() < PASSWORD_MIN_LENGTH {
            errors.push(FieldError::new(
                "password",
                format!("Password must be at least {PASSWORD_MIN_LENGTH} characters"),
            ));
        }

        if self.confirm_password.is_empty() {
            errors.push(FieldError::new("confirm_password", "Confirm your password"));
        } else if self.password != self.confirm_password {
            errors.push(FieldError::new("confirm_password", "Passwords do not match"));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewUser {
            name: self.name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            password: self.password,
        })
    }
}
