//! Rate limiting and request logging middleware.

use crate::error::ServerError;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::{num::NonZeroU32, sync::Arc, time::Instant};
use tracing::{debug, info, warn};

/// Global rate limiter (not keyed by IP).
pub type GlobalLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Rate limiter state shared across requests.
#[derive(Clone)]
pub struct RateLimitState {
    /// Limiter for all registration requests
    pub global: Arc<GlobalLimiter>,
}

impl RateLimitState {
    /// Allow `requests_per_minute` registration requests; zero is treated as one.
    pub fn new(requests_per_minute: u32) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN));

        Self {
            global: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// Create a permissive rate limiter for testing.
    pub fn permissive() -> Self {
        Self::new(1000)
    }
}

/// Rejects requests with 429 once the global quota is used up.
pub async fn rate_limit_middleware(
    State(rate_limit): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    if rate_limit.global.check().is_err() {
        warn!("Registration rate limit exceeded");
        return Err(ServerError::RateLimitExceeded);
    }

    Ok(next.run(request).await)
}

/// Label for how a request to the registration API ended.
pub fn request_outcome(status: StatusCode) -> &'static str {
    match status {
        StatusCode::CREATED => "registered",
        StatusCode::UNPROCESSABLE_ENTITY => "invalid form",
        StatusCode::CONFLICT => "already registered",
        StatusCode::TOO_MANY_REQUESTS => "rate limited",
        StatusCode::BAD_GATEWAY => "backend unavailable",
        s if s.is_success() => "ok",
        s if s.is_client_error() => "rejected",
        _ => "error",
    }
}

/// Logs each request with its registration outcome.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let elapsed = start.elapsed();
    let status = response.status();
    let outcome = request_outcome(status);

    if status.is_server_error() {
        warn!(%method, %path, %status, outcome, ?elapsed, "Registration API request failed");
    } else if status == StatusCode::CREATED {
        info!(%method, %path, outcome, ?elapsed, "Registration API request handled");
    } else {
        debug!(%method, %path, %status, outcome, ?elapsed, "Registration API request handled");
    }

    response
}
