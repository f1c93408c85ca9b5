//! Identity toolkit REST client.

use crate::error::{auth_error, FirebaseError};
use crate::types::*;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Default identity toolkit endpoint.
pub const DEFAULT_AUTH_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Client for the email/password account endpoints.
///
/// The web API key is stored using `SecretString` so it never shows up in
/// debug output.
#[derive(Clone)]
pub struct FirebaseAuth {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl FirebaseAuth {
    /// Create a new identity toolkit client.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FirebaseError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url: String = base_url.into();

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: SecretString::new(api_key.into()),
        })
    }

    /// Create an email/password account.
    #[instrument(skip(self, password))]
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpResponse, FirebaseError> {
        let request = SignUpRequest {
            email,
            password,
            return_secure_token: true,
        };

        let response: SignUpResponse = self.call("signUp", &request).await?;
        debug!(uid = %response.local_id, "Account created");
        Ok(response)
    }

    /// Set display name and photo URL of the account owning `id_token`.
    #[instrument(skip(self, id_token))]
    pub async fn update_account(
        &self,
        id_token: &str,
        display_name: &str,
        photo_url: &str,
    ) -> Result<UpdateAccountResponse, FirebaseError> {
        let request = UpdateAccountRequest {
            id_token,
            display_name,
            photo_url,
            return_secure_token: false,
        };

        self.call("update", &request).await
    }

    /// Delete the account owning `id_token`.
    #[instrument(skip(self, id_token))]
    pub async fn delete_user(&self, id_token: &str) -> Result<(), FirebaseError> {
        let request = DeleteAccountRequest { id_token };
        let _: serde_json::Value = self.call("delete", &request).await?;
        Ok(())
    }

    async fn call<B, T>(&self, operation: &str, body: &B) -> Result<T, FirebaseError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}/accounts:{}", self.base_url, operation))
            .query(&[("key", self.api_key.expose_secret().as_str())])
            .json(body)
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, FirebaseError> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return serde_json::from_str(&body).map_err(FirebaseError::from);
        }

        match serde_json::from_str::<AuthErrorBody>(&body) {
            Ok(envelope) => {
                warn!(
                    status = envelope.error.code,
                    message = %envelope.error.message,
                    "Identity toolkit rejected request"
                );
                Err(auth_error(&envelope.error.message))
            }
            Err(_) => {
                warn!(%status, "Identity toolkit returned an unexpected error body");
                Err(FirebaseError::Api {
                    status: status.as_u16(),
                    message: body,
                })
            }
        }
    }
}
