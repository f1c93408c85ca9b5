//! Seams to the hosted identity provider and user store.

use crate::error::BackendError;
use crate::memory::{MemoryIdentityProvider, MemoryUserStore};
use crate::types::{Account, Profile, UserRecord};
use async_trait::async_trait;
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

/// Creates and manages accounts.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account with e-mail and password credentials.
    async fn create_account(&self, email: &str, password: &str) -> Result<Account, BackendError>;

    /// Set the account's display name and photo URL.
    async fn update_profile(&self, account: &Account, profile: &Profile) -> Result<(), BackendError>;

    /// Delete the account.
    async fn delete_account(&self, account: &Account) -> Result<(), BackendError>;
}

/// The "users" collection of the realtime store.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Write the record under the account's uid, replacing any existing one.
    async fn save_user(&self, account: &Account, record: &UserRecord) -> Result<(), BackendError>;
}

/// Backend handles injected into a form.
#[derive(Clone)]
pub struct Backend {
    pub identity: Arc<dyn IdentityProvider>,
    pub users: Arc<dyn UserStore>,
}

impl Backend {
    pub fn new(identity: Arc<dyn IdentityProvider>, users: Arc<dyn UserStore>) -> Self {
        Self { identity, users }
    }

    /// A fresh in-memory backend.
    pub fn memory() -> Self {
        Self::new(
            Arc::new(MemoryIdentityProvider::new()),
            Arc::new(MemoryUserStore::new()),
        )
    }
}
