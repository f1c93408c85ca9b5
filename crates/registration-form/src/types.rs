//! Form and backend data types.

use crate::error::FormError;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four registration inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Username,
    Email,
    Password,
    PasswordConfirm,
}

impl FormField {
    /// All fields in display order.
    pub const ALL: [FormField; 4] = [
        FormField::Username,
        FormField::Email,
        FormField::Password,
        FormField::PasswordConfirm,
    ];

    /// Name used on the wire and in the rendered form.
    pub fn name(self) -> &'static str {
        match self {
            FormField::Username => "username",
            FormField::Email => "email",
            FormField::Password => "password",
            FormField::PasswordConfirm => "passwordConfirm",
        }
    }

    /// Keyword searched for in error messages to decide whether this input is
    /// highlighted. Both password inputs share a keyword.
    pub fn error_keyword(self) -> &'static str {
        match self {
            FormField::Username => "username",
            FormField::Email => "email",
            FormField::Password | FormField::PasswordConfirm => "password",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormField {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| FormError::UnknownField(s.to_string()))
    }
}

/// Raw values of the four inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

impl RegistrationInput {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Username => &self.username,
            FormField::Email => &self.email,
            FormField::Password => &self.password,
            FormField::PasswordConfirm => &self.password_confirm,
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::Username => self.username = value,
            FormField::Email => self.email = value,
            FormField::Password => self.password = value,
            FormField::PasswordConfirm => self.password_confirm = value,
        }
    }
}

/// Where a message in the error list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Local validation, fixed friendly text
    Validation,
    /// Identity provider or user store, text as reported
    Remote,
}

/// An entry in the form's error list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormMessage {
    pub kind: MessageKind,
    pub message: String,
}

impl FormMessage {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Validation,
            message: message.into(),
        }
    }

    pub fn remote(message: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Remote,
            message: message.into(),
        }
    }

    /// Case-insensitive substring match used for field highlighting.
    pub fn mentions(&self, keyword: &str) -> bool {
        self.message.to_lowercase().contains(keyword)
    }
}

/// Steps of the remote registration chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStage {
    CreateAccount,
    UpdateProfile,
    SaveUser,
}

impl fmt::Display for RegistrationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegistrationStage::CreateAccount => "Account creation",
            RegistrationStage::UpdateProfile => "Profile update",
            RegistrationStage::SaveUser => "User record save",
        };
        f.write_str(name)
    }
}

/// Lifecycle of a mounted form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormStatus {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// Remote chain in flight
    Submitting,
    /// Account created, profile updated and record saved
    Registered(RegisteredUser),
    /// Last attempt failed validation or was rejected
    Failed,
}

/// Account handle returned by an identity provider.
#[derive(Debug, Clone)]
pub struct Account {
    /// Unique identifier, also the key of the user record
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    /// Credential proving the caller owns this account
    pub id_token: SecretString,
}

impl Account {
    pub fn new(uid: impl Into<String>, email: impl Into<String>, id_token: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
            display_name: None,
            photo_url: None,
            id_token: SecretString::new(id_token.into()),
        }
    }

    /// Apply a profile that the identity provider accepted.
    pub fn apply_profile(&mut self, profile: Profile) {
        self.display_name = Some(profile.display_name);
        self.photo_url = Some(profile.photo_url);
    }
}

/// Profile update payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub display_name: String,
    pub photo_url: String,
}

/// Record persisted in the users collection under the account's uid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: Option<String>,
    pub avatar: Option<String>,
}

impl UserRecord {
    pub fn from_account(account: &Account) -> Self {
        Self {
            name: account.display_name.clone(),
            avatar: account.photo_url.clone(),
        }
    }
}

/// Summary of a completed registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredUser {
    pub uid: String,
    pub name: String,
    pub avatar: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_field_from_name() {
        assert_eq!("username".parse::<FormField>(), Ok(FormField::Username));
        assert_eq!("passwordConfirm".parse::<FormField>(), Ok(FormField::PasswordConfirm));
        assert_eq!(
            "password_confirm".parse::<FormField>(),
            Err(FormError::UnknownField("password_confirm".into()))
        );
    }

    #[test]
    fn test_password_fields_share_keyword() {
        assert_eq!(FormField::Password.error_keyword(), "password");
        assert_eq!(FormField::PasswordConfirm.error_keyword(), "password");
        assert_eq!(FormField::Email.error_keyword(), "email");
    }

    #[test]
    fn test_message_mentions_is_case_insensitive() {
        let message = FormMessage::remote("The EMAIL address is badly formatted.");
        assert!(message.mentions("email"));
        assert!(!message.mentions("password"));
    }

    #[test]
    fn test_input_deserializes_camel_case_with_defaults() {
        let json = r#"{"username": "ada", "passwordConfirm": "secret1"}"#;
        let input: RegistrationInput = serde_json::from_str(json).unwrap();

        assert_eq!(input.username, "ada");
        assert_eq!(input.email, "");
        assert_eq!(input.password_confirm, "secret1");
    }

    #[test]
    fn test_user_record_field_names() {
        let record = UserRecord {
            name: Some("ada".into()),
            avatar: Some("http://gravatar.com/avatar/abc?d=identicon".into()),
        };
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["name"], "ada");
        assert_eq!(json["avatar"], "http://gravatar.com/avatar/abc?d=identicon");
    }

    #[test]
    fn test_account_apply_profile() {
        let mut account = Account::new("uid-1", "ada@example.com", "token");
        account.apply_profile(Profile {
            display_name: "ada".into(),
            photo_url: "http://example.com/a.png".into(),
        });

        assert_eq!(account.display_name.as_deref(), Some("ada"));
        assert_eq!(
            UserRecord::from_account(&account).avatar.as_deref(),
            Some("http://example.com/a.png")
        );
    }
}
