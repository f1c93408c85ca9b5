//! Registration form errors.

use crate::types::RegistrationStage;
use thiserror::Error;

/// Message shown when any of the four inputs is empty.
pub const EMPTY_FIELDS_MESSAGE: &str = "Fill in all fields";

/// Message shown when the password is too short or the confirmation differs.
pub const INVALID_PASSWORD_MESSAGE: &str = "Password is invalid";

/// Local validation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{}", EMPTY_FIELDS_MESSAGE)]
    EmptyFields,

    #[error("{}", INVALID_PASSWORD_MESSAGE)]
    InvalidPassword,
}

/// Errors reported by an identity provider or user store.
///
/// `Rejected` carries the service's own message and displays it verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("{0}")]
    Rejected(String),

    #[error("{0}")]
    Unavailable(String),
}

impl BackendError {
    /// The message as reported by the backend.
    pub fn message(&self) -> &str {
        match self {
            BackendError::Rejected(message) | BackendError::Unavailable(message) => message,
        }
    }
}

/// Why a submit attempt did not register the user.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("{0}")]
    Invalid(#[from] ValidationError),

    #[error("{stage} failed: {source}")]
    Rejected {
        stage: RegistrationStage,
        #[source]
        source: BackendError,
    },

    #[error("This form has already registered an account")]
    AlreadyRegistered,
}

/// Errors from direct form manipulation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Unknown form field: {0}")]
    UnknownField(String),
}
