//! HTTP request handlers.

use super::types::{HealthResponse, RegisterRequest};
use super::AppState;
use crate::error::ServerError;
use axum::{extract::State, http::StatusCode, Json};
use registration_form::{BackendError, FormView, SubmitError};
use tracing::info;

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        backend: state.backend_kind.to_string(),
    })
}

/// Blank registration form.
pub async fn blank_form(State(state): State<AppState>) -> Json<FormView> {
    Json(state.mount_form().view())
}

/// Submit a registration.
///
/// The body is always the resulting form view; the status code tells
/// whether the user was registered, failed validation or was rejected.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<FormView>), ServerError> {
    let mut form = state.mount_form();
    for (name, value) in request {
        form.set_field(&name, value)?;
    }

    let status = match form.handle_submit().await {
        Ok(user) => {
            info!(uid = %user.uid, "Registration completed");
            StatusCode::CREATED
        }
        Err(SubmitError::Invalid(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        Err(SubmitError::Rejected {
            source: BackendError::Unavailable(_),
            ..
        }) => StatusCode::BAD_GATEWAY,
        Err(SubmitError::Rejected { .. }) => StatusCode::BAD_REQUEST,
        Err(SubmitError::AlreadyRegistered) => StatusCode::CONFLICT,
    };

    Ok((status, Json(form.view())))
}
