//! The registration form: input state, validation and the submit chain.

use crate::avatar::Gravatar;
use crate::backend::{Backend, IdentityProvider};
use crate::error::{BackendError, FormError, SubmitError, ValidationError};
use crate::types::{
    Account, FormField, FormMessage, FormStatus, Profile, RegisteredUser, RegistrationInput,
    RegistrationStage, UserRecord,
};
use crate::validation;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{error, info, instrument, warn};

/// A mounted registration form bound to a backend.
///
/// The form owns its inputs and error list. `handle_submit` borrows it
/// mutably for the whole remote chain, so a second submit cannot start while
/// one is pending.
pub struct RegistrationForm {
    input: RegistrationInput,
    errors: Vec<FormMessage>,
    status: FormStatus,
    backend: Backend,
    gravatar: Gravatar,
}

impl RegistrationForm {
    /// Mount an empty form.
    pub fn new(backend: Backend) -> Self {
        Self {
            input: RegistrationInput::default(),
            errors: Vec::new(),
            status: FormStatus::Idle,
            backend,
            gravatar: Gravatar::default(),
        }
    }

    /// Use a different avatar service.
    pub fn with_gravatar(mut self, gravatar: Gravatar) -> Self {
        self.gravatar = gravatar;
        self
    }

    /// Replace the value of one input.
    pub fn handle_change(&mut self, field: FormField, value: impl Into<String>) {
        self.input.set(field, value.into());
    }

    /// Replace the value of the input called `name`.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        let field: FormField = name.parse()?;
        self.handle_change(field, value);
        Ok(())
    }

    /// Current value of an input.
    pub fn value(&self, field: FormField) -> &str {
        self.input.get(field)
    }

    pub fn input(&self) -> &RegistrationInput {
        &self.input
    }

    pub fn errors(&self) -> &[FormMessage] {
        &self.errors
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    /// True while the remote chain is in flight.
    pub fn is_loading(&self) -> bool {
        self.status == FormStatus::Submitting
    }

    /// The registered user, once the chain has completed.
    pub fn registered_user(&self) -> Option<&RegisteredUser> {
        match &self.status {
            FormStatus::Registered(user) => Some(user),
            _ => None,
        }
    }

    /// Run local validation. On failure the error list holds exactly the one
    /// failing rule's message.
    pub fn is_form_valid(&mut self) -> bool {
        self.check_form().is_ok()
    }

    fn check_form(&mut self) -> Result<(), ValidationError> {
        validation::validate(&self.input).map_err(|e| {
            self.errors = vec![FormMessage::validation(e.to_string())];
            e
        })
    }

    /// Whether `field` should be highlighted: any current error mentions the
    /// field's keyword.
    pub fn input_has_error(&self, field: FormField) -> bool {
        let keyword = field.error_keyword();
        self.errors.iter().any(|message| message.mentions(keyword))
    }

    /// Validate and, if valid, create the account, set its profile and save
    /// the user record.
    ///
    /// Any rejection stops the chain and surfaces the backend's message. When
    /// the profile update or record save fails, the freshly created account
    /// is deleted again. Dropping the returned future mid-chain returns the
    /// form to `Idle` and deletes a created account in the background.
    #[instrument(skip(self))]
    pub async fn handle_submit(&mut self) -> Result<RegisteredUser, SubmitError> {
        if self.registered_user().is_some() {
            return Err(SubmitError::AlreadyRegistered);
        }

        if let Err(e) = self.check_form() {
            self.status = FormStatus::Failed;
            return Err(SubmitError::Invalid(e));
        }

        self.errors.clear();
        let in_flight = InFlight::start(&mut self.status);

        match register(&self.backend, &self.gravatar, &self.input).await {
            Ok(user) => {
                info!(uid = %user.uid, "User registered");
                in_flight.finish(FormStatus::Registered(user.clone()));
                Ok(user)
            }
            Err((stage, e)) => {
                error!(%stage, error = %e, "Registration failed");
                in_flight.finish(FormStatus::Failed);
                self.errors.push(FormMessage::remote(e.message()));
                Err(SubmitError::Rejected { stage, source: e })
            }
        }
    }
}

async fn register(
    backend: &Backend,
    gravatar: &Gravatar,
    input: &RegistrationInput,
) -> Result<RegisteredUser, (RegistrationStage, BackendError)> {
    let identity = &backend.identity;

    let mut account = identity
        .create_account(&input.email, &input.password)
        .await
        .map_err(|e| (RegistrationStage::CreateAccount, e))?;
    let pending = PendingAccount::new(identity.clone(), &account);

    let profile = Profile {
        display_name: input.username.clone(),
        photo_url: gravatar.url(&account.email),
    };

    if let Err(e) = identity.update_profile(&account, &profile).await {
        pending.discard().await;
        return Err((RegistrationStage::UpdateProfile, e));
    }
    account.apply_profile(profile);

    let record = UserRecord::from_account(&account);
    if let Err(e) = backend.users.save_user(&account, &record).await {
        pending.discard().await;
        return Err((RegistrationStage::SaveUser, e));
    }
    pending.keep();

    Ok(RegisteredUser {
        uid: account.uid,
        name: record.name.unwrap_or_default(),
        avatar: record.avatar.unwrap_or_default(),
    })
}

/// Marks the form as submitting until the chain settles. If the submit
/// future is dropped first, the form goes back to `Idle`.
struct InFlight<'a> {
    status: &'a mut FormStatus,
}

impl<'a> InFlight<'a> {
    fn start(status: &'a mut FormStatus) -> Self {
        *status = FormStatus::Submitting;
        Self { status }
    }

    fn finish(self, outcome: FormStatus) {
        *self.status = outcome;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if *self.status == FormStatus::Submitting {
            warn!("Registration cancelled before completing");
            *self.status = FormStatus::Idle;
        }
    }
}

/// An account created by the chain that has not been fully registered yet.
///
/// Dropped without `keep` or `discard`, it deletes the account on a
/// background task.
struct PendingAccount {
    identity: Arc<dyn IdentityProvider>,
    account: Option<Account>,
}

impl PendingAccount {
    fn new(identity: Arc<dyn IdentityProvider>, account: &Account) -> Self {
        Self {
            identity,
            account: Some(account.clone()),
        }
    }

    fn keep(mut self) {
        self.account = None;
    }

    async fn discard(mut self) {
        if let Some(account) = self.account.take() {
            discard_account(self.identity.as_ref(), &account).await;
        }
    }
}

impl Drop for PendingAccount {
    fn drop(&mut self) {
        let Some(account) = self.account.take() else {
            return;
        };

        match Handle::try_current() {
            Ok(handle) => {
                let identity = self.identity.clone();
                handle.spawn(async move {
                    discard_account(identity.as_ref(), &account).await;
                });
            }
            Err(_) => warn!(
                uid = %account.uid,
                "No runtime to remove partially registered account"
            ),
        }
    }
}

/// Delete an account whose registration could not be completed.
async fn discard_account(identity: &dyn IdentityProvider, account: &Account) {
    match identity.delete_account(account).await {
        Ok(()) => info!(uid = %account.uid, "Removed partially registered account"),
        Err(e) => warn!(
            uid = %account.uid,
            error = %e,
            "Failed to remove partially registered account"
        ),
    }
}
