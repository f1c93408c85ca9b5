//! Error types for the registration server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use registration_form::FormError;
use serde::Serialize;
use thiserror::Error;

/// Server error types.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Unknown form field: {0}")]
    UnknownField(String),

    #[error("Backend configuration error: {0}")]
    BackendConfig(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ServerError::UnknownField(_) => (StatusCode::BAD_REQUEST, "UNKNOWN_FIELD"),
            ServerError::BackendConfig(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "BACKEND_CONFIG_ERROR")
            }
            ServerError::RateLimitExceeded => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED"),
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<FormError> for ServerError {
    fn from(e: FormError) -> Self {
        match e {
            FormError::UnknownField(name) => ServerError::UnknownField(name),
        }
    }
}

impl From<firebase_client::FirebaseError> for ServerError {
    fn from(e: firebase_client::FirebaseError) -> Self {
        ServerError::BackendConfig(e.to_string())
    }
}
