//! In-memory identity provider and user store.
//!
//! Used for local development and tests. Both types can be told to reject
//! their next call so failure paths can be exercised without a real service.

use crate::backend::{IdentityProvider, UserStore};
use crate::error::BackendError;
use crate::types::{Account, Profile, UserRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use secrecy::ExposeSecret;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument};

const UID_LENGTH: usize = 28;
const TOKEN_LENGTH: usize = 40;

pub const EMAIL_IN_USE_MESSAGE: &str = "The email address is already in use by another account.";
pub const USER_NOT_FOUND_MESSAGE: &str =
    "There is no user record corresponding to this identifier. The user may have been deleted.";
pub const INVALID_TOKEN_MESSAGE: &str =
    "This user's credential isn't valid for this project. The user must sign in again.";

/// Identity provider operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityOperation {
    CreateAccount,
    UpdateProfile,
    DeleteAccount,
}

/// Account as held by the in-memory provider.
#[derive(Debug, Clone)]
pub struct StoredAccount {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    password_hash: String,
    token_hash: String,
}

impl StoredAccount {
    /// Check a password against the stored hash.
    pub fn verify_password(&self, password: &str) -> bool {
        hash_secret(password) == self.password_hash
    }
}

/// In-memory identity provider.
#[derive(Default)]
pub struct MemoryIdentityProvider {
    accounts: RwLock<HashMap<String, StoredAccount>>,
    failures: Mutex<HashMap<IdentityOperation, String>>,
}

impl MemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the next call to `operation` with `message`.
    pub async fn fail_next(&self, operation: IdentityOperation, message: impl Into<String>) {
        self.failures.lock().await.insert(operation, message.into());
    }

    /// Get an account by uid.
    pub async fn get(&self, uid: &str) -> Option<StoredAccount> {
        self.accounts.read().await.get(uid).cloned()
    }

    /// Find an account by e-mail, ignoring case.
    pub async fn find_by_email(&self, email: &str) -> Option<StoredAccount> {
        let email = email.to_lowercase();
        self.accounts
            .read()
            .await
            .values()
            .find(|account| account.email.to_lowercase() == email)
            .cloned()
    }

    /// Number of accounts.
    pub async fn count(&self) -> usize {
        self.accounts.read().await.len()
    }

    async fn take_failure(&self, operation: IdentityOperation) -> Result<(), BackendError> {
        match self.failures.lock().await.remove(&operation) {
            Some(message) => Err(BackendError::Rejected(message)),
            None => Ok(()),
        }
    }

    fn authorize<'a>(
        accounts: &'a mut HashMap<String, StoredAccount>,
        account: &Account,
    ) -> Result<&'a mut StoredAccount, BackendError> {
        let stored = accounts
            .get_mut(&account.uid)
            .ok_or_else(|| BackendError::Rejected(USER_NOT_FOUND_MESSAGE.into()))?;

        if hash_secret(account.id_token.expose_secret()) != stored.token_hash {
            return Err(BackendError::Rejected(INVALID_TOKEN_MESSAGE.into()));
        }

        Ok(stored)
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    #[instrument(skip(self, password))]
    async fn create_account(&self, email: &str, password: &str) -> Result<Account, BackendError> {
        self.take_failure(IdentityOperation::CreateAccount).await?;

        let mut accounts = self.accounts.write().await;
        let normalized = email.to_lowercase();
        if accounts
            .values()
            .any(|account| account.email.to_lowercase() == normalized)
        {
            debug!("E-mail already registered");
            return Err(BackendError::Rejected(EMAIL_IN_USE_MESSAGE.into()));
        }

        let uid = random_string(UID_LENGTH);
        let token = random_string(TOKEN_LENGTH);

        accounts.insert(
            uid.clone(),
            StoredAccount {
                uid: uid.clone(),
                email: email.to_string(),
                display_name: None,
                photo_url: None,
                created_at: Utc::now(),
                password_hash: hash_secret(password),
                token_hash: hash_secret(&token),
            },
        );

        info!(uid = %uid, "Account created");
        Ok(Account::new(uid, email, token))
    }

    #[instrument(skip(self, account, profile), fields(uid = %account.uid))]
    async fn update_profile(&self, account: &Account, profile: &Profile) -> Result<(), BackendError> {
        self.take_failure(IdentityOperation::UpdateProfile).await?;

        let mut accounts = self.accounts.write().await;
        let stored = Self::authorize(&mut accounts, account)?;
        stored.display_name = Some(profile.display_name.clone());
        stored.photo_url = Some(profile.photo_url.clone());

        debug!("Profile updated");
        Ok(())
    }

    #[instrument(skip(self, account), fields(uid = %account.uid))]
    async fn delete_account(&self, account: &Account) -> Result<(), BackendError> {
        self.take_failure(IdentityOperation::DeleteAccount).await?;

        let mut accounts = self.accounts.write().await;
        Self::authorize(&mut accounts, account)?;
        accounts.remove(&account.uid);

        info!("Account deleted");
        Ok(())
    }
}

/// In-memory users collection.
#[derive(Default)]
pub struct MemoryUserStore {
    records: RwLock<HashMap<String, UserRecord>>,
    next_failure: Mutex<Option<String>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the next save with `message`.
    pub async fn fail_next_save(&self, message: impl Into<String>) {
        *self.next_failure.lock().await = Some(message.into());
    }

    /// Get the record stored under a uid.
    pub async fn get(&self, uid: &str) -> Option<UserRecord> {
        self.records.read().await.get(uid).cloned()
    }

    /// Number of records.
    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    #[instrument(skip(self, account, record), fields(uid = %account.uid))]
    async fn save_user(&self, account: &Account, record: &UserRecord) -> Result<(), BackendError> {
        if let Some(message) = self.next_failure.lock().await.take() {
            return Err(BackendError::Rejected(message));
        }

        self.records
            .write()
            .await
            .insert(account.uid.clone(), record.clone());

        debug!("User record saved");
        Ok(())
    }
}

fn random_string(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

fn hash_secret(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}
