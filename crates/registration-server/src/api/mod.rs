//! HTTP API for the registration form.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::{logging_middleware, rate_limit_middleware, RateLimitState};
pub use types::*;

use crate::config::{BackendKind, Config};
use crate::error::ServerError;
use axum::{middleware as axum_middleware, routing::get, Router};
use firebase_client::{firebase_backend, FirebaseAuth, RealtimeDatabase};
use registration_form::{Backend, Gravatar, RegistrationForm};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Identity provider and users collection shared by all forms
    pub backend: Backend,
    /// Which kind of backend is wired in
    pub backend_kind: BackendKind,
    /// Avatar URL builder handed to each form
    pub gravatar: Gravatar,
}

impl AppState {
    /// Create new application state.
    pub fn new(backend: Backend, backend_kind: BackendKind, gravatar: Gravatar) -> Self {
        Self {
            backend,
            backend_kind,
            gravatar,
        }
    }

    /// Build the backend selected in the configuration.
    pub fn from_config(config: &Config) -> Result<Self, ServerError> {
        let backend = match config.backend.kind {
            BackendKind::Memory => {
                info!("Using in-memory backend, registrations are lost on restart");
                Backend::memory()
            }
            BackendKind::Firebase => {
                let firebase = &config.firebase;
                let api_key = firebase.api_key.clone().ok_or_else(|| {
                    ServerError::BackendConfig("FIREBASE__API_KEY is not set".into())
                })?;
                let database_url = firebase.database_url.clone().ok_or_else(|| {
                    ServerError::BackendConfig("FIREBASE__DATABASE_URL is not set".into())
                })?;

                let auth = FirebaseAuth::new(api_key, firebase.auth_url.clone(), firebase.timeout)?;
                let users = RealtimeDatabase::new(database_url, firebase.timeout)?
                    .collection(firebase.users_collection.clone());

                info!(collection = %firebase.users_collection, "Using Firebase backend");
                firebase_backend(auth, users)
            }
        };

        Ok(Self::new(
            backend,
            config.backend.kind,
            Gravatar::new(config.avatar.base_url.clone()),
        ))
    }

    /// Mount a fresh form against the shared backend.
    pub fn mount_form(&self) -> RegistrationForm {
        RegistrationForm::new(self.backend.clone()).with_gravatar(self.gravatar.clone())
    }
}

/// Create the API router with default rate limiting.
pub fn create_router(state: AppState) -> Router {
    create_router_with_rate_limit(state, RateLimitState::new(30))
}

/// Create the API router with custom rate limiting.
pub fn create_router_with_rate_limit(state: AppState, rate_limit: RateLimitState) -> Router {
    // Registration endpoints (with rate limiting)
    let registration = Router::new()
        .route(
            "/v1/register",
            get(handlers::blank_form).post(handlers::register),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            rate_limit,
            rate_limit_middleware,
        ));

    Router::new()
        // Health check (no rate limiting)
        .route("/health", get(handlers::health))
        .merge(registration)
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_state_from_default_config() {
        let state = AppState::from_config(&Config::default()).unwrap();

        assert_eq!(state.backend_kind, BackendKind::Memory);
        assert!(state.mount_form().errors().is_empty());
    }

    #[test]
    fn test_firebase_requires_api_key() {
        let mut config = Config::default();
        config.backend.kind = BackendKind::Firebase;
        config.firebase.database_url = Some("https://devchat.firebaseio.com".into());

        let result = AppState::from_config(&config);

        assert!(matches!(result, Err(ServerError::BackendConfig(_))));
    }

    #[test]
    fn test_firebase_state_from_config() {
        let mut config = Config::default();
        config.backend.kind = BackendKind::Firebase;
        config.firebase.api_key = Some("web-key".into());
        config.firebase.database_url = Some("https://devchat.firebaseio.com".into());

        let state = AppState::from_config(&config).unwrap();

        assert_eq!(state.backend_kind, BackendKind::Firebase);
    }
}
