//! Identity toolkit and realtime database wire types.

use serde::{Deserialize, Serialize};

/// `accounts:signUp` request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub return_secure_token: bool,
}

/// `accounts:signUp` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponse {
    /// The new account's uid
    pub local_id: String,
    pub email: String,
    pub id_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Token lifetime in seconds, as a string
    #[serde(default)]
    pub expires_in: Option<String>,
}

/// `accounts:update` request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest<'a> {
    pub id_token: &'a str,
    pub display_name: &'a str,
    pub photo_url: &'a str,
    pub return_secure_token: bool,
}

/// `accounts:update` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountResponse {
    pub local_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// `accounts:delete` request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccountRequest<'a> {
    pub id_token: &'a str,
}

/// Identity toolkit error envelope.
#[derive(Debug, Deserialize)]
pub struct AuthErrorBody {
    pub error: AuthErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct AuthErrorDetail {
    pub code: u16,
    pub message: String,
}

/// Realtime database error envelope.
#[derive(Debug, Deserialize)]
pub struct DatabaseErrorBody {
    pub error: String,
}
