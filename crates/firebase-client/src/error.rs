//! Firebase client errors.

use registration_form::BackendError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FirebaseError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Identity toolkit rejected the request. `message` is user-facing.
    #[error("{message}")]
    Auth { code: String, message: String },

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<FirebaseError> for BackendError {
    fn from(e: FirebaseError) -> Self {
        match e {
            FirebaseError::Auth { message, .. } => BackendError::Rejected(message),
            FirebaseError::Api { message, .. } => BackendError::Rejected(message),
            FirebaseError::Http(e) => BackendError::Unavailable(e.to_string()),
            FirebaseError::Json(e) => {
                BackendError::Unavailable(format!("Unexpected response from Firebase: {}", e))
            }
        }
    }
}

/// Translate an identity toolkit error string such as `EMAIL_EXISTS` or
/// `WEAK_PASSWORD : Password should be at least 6 characters` into the code
/// and the message shown to users.
pub fn auth_error(raw: &str) -> FirebaseError {
    let (code, detail) = match raw.split_once(" : ") {
        Some((code, detail)) => (code.trim(), Some(detail.trim())),
        None => (raw.trim(), None),
    };

    let message = match code {
        "EMAIL_EXISTS" => "The email address is already in use by another account.",
        "INVALID_EMAIL" => "The email address is badly formatted.",
        "WEAK_PASSWORD" => detail.unwrap_or("Password should be at least 6 characters"),
        "MISSING_PASSWORD" => "A non-empty password must be provided",
        "OPERATION_NOT_ALLOWED" => {
            "The given sign-in provider is disabled for this Firebase project."
        }
        "TOO_MANY_ATTEMPTS_TRY_LATER" => {
            "We have blocked all requests from this device due to unusual activity. Try again later."
        }
        "USER_NOT_FOUND" => {
            "There is no user record corresponding to this identifier. The user may have been deleted."
        }
        "USER_DISABLED" => "The user account has been disabled by an administrator.",
        "INVALID_ID_TOKEN" => {
            "This user's credential isn't valid for this project. The user must sign in again."
        }
        "TOKEN_EXPIRED" => "The user's credential is no longer valid. The user must sign in again.",
        _ => detail.unwrap_or(code),
    };

    FirebaseError::Auth {
        code: code.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_of(e: FirebaseError) -> (String, String) {
        match e {
            FirebaseError::Auth { code, message } => (code, message),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_known_code() {
        let (code, message) = message_of(auth_error("EMAIL_EXISTS"));
        assert_eq!(code, "EMAIL_EXISTS");
        assert_eq!(message, "The email address is already in use by another account.");
    }

    #[test]
    fn test_code_with_detail() {
        let (code, message) =
            message_of(auth_error("WEAK_PASSWORD : Password should be at least 6 characters"));
        assert_eq!(code, "WEAK_PASSWORD");
        assert_eq!(message, "Password should be at least 6 characters");
    }

    #[test]
    fn test_unknown_code_passes_through() {
        let (code, message) = message_of(auth_error("PROJECT_NOT_FOUND"));
        assert_eq!(code, "PROJECT_NOT_FOUND");
        assert_eq!(message, "PROJECT_NOT_FOUND");

        let (_, message) = message_of(auth_error("INVALID_ARGUMENT : Bad request body"));
        assert_eq!(message, "Bad request body");
    }

    #[test]
    fn test_into_backend_error() {
        let backend: BackendError = auth_error("INVALID_EMAIL").into();
        assert_eq!(
            backend,
            BackendError::Rejected("The email address is badly formatted.".into())
        );

        let backend: BackendError = FirebaseError::Api {
            status: 401,
            message: "Permission denied".into(),
        }
        .into();
        assert_eq!(backend, BackendError::Rejected("Permission denied".into()));
    }
}
