//! DevChat registration form.
//!
//! Collects a username, e-mail and password, validates them locally and
//! registers the user against an injected backend:
//! - create the account with the identity provider
//! - set its display name and identicon avatar
//! - save the user record in the users collection

pub mod avatar;
pub mod backend;
mod error;
mod form;
pub mod memory;
mod types;
pub mod validation;
pub mod view;

pub use avatar::Gravatar;
pub use backend::{Backend, IdentityProvider, UserStore};
pub use error::{
    BackendError, FormError, SubmitError, ValidationError, EMPTY_FIELDS_MESSAGE,
    INVALID_PASSWORD_MESSAGE,
};
pub use form::RegistrationForm;
pub use types::*;
pub use view::FormView;
