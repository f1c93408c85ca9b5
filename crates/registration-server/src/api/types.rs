//! API request and response types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub backend: String,
}

/// Registration submission: form field name to value.
///
/// Field names are those of the rendered form (`username`, `email`,
/// `password`, `passwordConfirm`). Missing fields stay empty.
pub type RegisterRequest = BTreeMap<String, String>;
