//! Client-side checks run before anything is sent to the backend.

use crate::error::ValidationError;
use crate::types::{FormField, RegistrationInput};

/// Minimum password length, counted in UTF-16 code units as the hosted
/// identity provider does.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Validate the four inputs, stopping at the first failing rule.
pub fn validate(input: &RegistrationInput) -> Result<(), ValidationError> {
    if is_form_empty(input) {
        return Err(ValidationError::EmptyFields);
    }

    if !is_password_valid(&input.password, &input.password_confirm) {
        return Err(ValidationError::InvalidPassword);
    }

    Ok(())
}

/// True when any input is the empty string.
pub fn is_form_empty(input: &RegistrationInput) -> bool {
    FormField::ALL.iter().any(|field| input.get(*field).is_empty())
}

/// Both passwords long enough and identical.
pub fn is_password_valid(password: &str, password_confirm: &str) -> bool {
    if password_length(password) < MIN_PASSWORD_LENGTH
        || password_length(password_confirm) < MIN_PASSWORD_LENGTH
    {
        return false;
    }

    password == password_confirm
}

fn password_length(password: &str) -> usize {
    password.encode_utf16().count()
}
