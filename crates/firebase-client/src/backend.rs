//! Registration backend implemented on top of Firebase.

use crate::auth::FirebaseAuth;
use crate::database::UserCollection;
use async_trait::async_trait;
use registration_form::{
    Account, Backend, BackendError, IdentityProvider, Profile, UserRecord, UserStore,
};
use secrecy::ExposeSecret;
use std::sync::Arc;

#[async_trait]
impl IdentityProvider for FirebaseAuth {
    async fn create_account(&self, email: &str, password: &str) -> Result<Account, BackendError> {
        let created = self.sign_up(email, password).await?;
        Ok(Account::new(created.local_id, created.email, created.id_token))
    }

    async fn update_profile(&self, account: &Account, profile: &Profile) -> Result<(), BackendError> {
        self.update_account(
            account.id_token.expose_secret(),
            &profile.display_name,
            &profile.photo_url,
        )
        .await?;
        Ok(())
    }

    async fn delete_account(&self, account: &Account) -> Result<(), BackendError> {
        self.delete_user(account.id_token.expose_secret()).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for UserCollection {
    async fn save_user(&self, account: &Account, record: &UserRecord) -> Result<(), BackendError> {
        self.database()
            .set(&self.path(&account.uid), account.id_token.expose_secret(), record)
            .await?;
        Ok(())
    }
}

/// Wire a backend from an auth client and a users collection.
pub fn firebase_backend(auth: FirebaseAuth, users: UserCollection) -> Backend {
    Backend::new(Arc::new(auth), Arc::new(users))
}
