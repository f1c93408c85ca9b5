//! Realtime database REST client.

use crate::error::FirebaseError;
use crate::types::DatabaseErrorBody;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use urlencoding::encode;

/// Client for a realtime database instance.
#[derive(Clone)]
pub struct RealtimeDatabase {
    client: Client,
    database_url: String,
}

impl RealtimeDatabase {
    /// Create a client for the database at `database_url`.
    pub fn new(database_url: impl Into<String>, timeout: Duration) -> Result<Self, FirebaseError> {
        let client = Client::builder().timeout(timeout).build()?;
        let database_url: String = database_url.into();

        Ok(Self {
            client,
            database_url: database_url.trim_end_matches('/').to_string(),
        })
    }

    /// Reference to a top-level collection.
    pub fn collection(&self, name: impl Into<String>) -> UserCollection {
        UserCollection {
            db: self.clone(),
            name: name.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}.json", self.database_url, path.trim_matches('/'))
    }

    /// Write `value` at `path`, replacing whatever is there.
    #[instrument(skip(self, auth, value))]
    pub async fn set<T: Serialize + ?Sized>(
        &self,
        path: &str,
        auth: &str,
        value: &T,
    ) -> Result<(), FirebaseError> {
        let request = self.client.put(self.url(path)).json(value);
        let _: serde_json::Value = self.send(request, auth).await?;

        debug!("Value written");
        Ok(())
    }

    /// Read the value at `path`, `None` when nothing is stored there.
    #[instrument(skip(self, auth))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        auth: &str,
    ) -> Result<Option<T>, FirebaseError> {
        let request = self.client.get(self.url(path));
        self.send(request, auth).await
    }

    /// Delete the value at `path`.
    #[instrument(skip(self, auth))]
    pub async fn remove(&self, path: &str, auth: &str) -> Result<(), FirebaseError> {
        let request = self.client.delete(self.url(path));
        let _: serde_json::Value = self.send(request, auth).await?;
        Ok(())
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        auth: &str,
    ) -> Result<T, FirebaseError> {
        let response = request.query(&[("auth", auth)]).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return serde_json::from_str(&body).map_err(FirebaseError::from);
        }

        let message = serde_json::from_str::<DatabaseErrorBody>(&body)
            .map(|envelope| envelope.error)
            .unwrap_or(body);
        warn!(%status, %message, "Realtime database request failed");

        Err(FirebaseError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// A collection of records keyed by uid.
#[derive(Clone)]
pub struct UserCollection {
    db: RealtimeDatabase,
    name: String,
}

impl UserCollection {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn database(&self) -> &RealtimeDatabase {
        &self.db
    }

    /// Path of the record for `uid`.
    pub fn path(&self, uid: &str) -> String {
        format!("{}/{}", self.name, encode(uid))
    }

    /// Read the record for `uid`.
    pub async fn get<T: DeserializeOwned>(&self, uid: &str, auth: &str) -> Result<Option<T>, FirebaseError> {
        self.db.get(&self.path(uid), auth).await
    }

    /// Delete the record for `uid`.
    pub async fn remove(&self, uid: &str, auth: &str) -> Result<(), FirebaseError> {
        self.db.remove(&self.path(uid), auth).await
    }
}
