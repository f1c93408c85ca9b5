//! Serializable description of the rendered form.

use crate::form::RegistrationForm;
use crate::types::FormField;
use serde::{Deserialize, Serialize};

pub const FORM_TITLE: &str = "Register for DevChat";
pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

/// Everything needed to draw the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormView {
    pub title: String,
    pub fields: Vec<FieldView>,
    pub submit: SubmitButton,
    pub errors: Vec<String>,
    pub login_link: LinkView,
    /// Where to go once registration completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldView {
    pub name: String,
    pub placeholder: String,
    pub icon: String,
    pub input_type: String,
    /// Omitted for password inputs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub error: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitButton {
    pub label: String,
    pub disabled: bool,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkView {
    pub prompt: String,
    pub label: String,
    pub href: String,
}

fn field_view(form: &RegistrationForm, field: FormField) -> FieldView {
    let (placeholder, icon, input_type) = match field {
        FormField::Username => ("Username", "user", "text"),
        FormField::Email => ("Email Address", "mail", "email"),
        FormField::Password => ("Password", "lock", "password"),
        FormField::PasswordConfirm => ("Confirm Password", "repeat", "password"),
    };

    let value = (input_type != "password").then(|| form.value(field).to_string());

    FieldView {
        name: field.name().to_string(),
        placeholder: placeholder.to_string(),
        icon: icon.to_string(),
        input_type: input_type.to_string(),
        value,
        error: form.input_has_error(field),
    }
}

impl RegistrationForm {
    /// Describe the form in its current state.
    pub fn view(&self) -> FormView {
        let loading = self.is_loading();
        let registered = self.registered_user().is_some();

        FormView {
            title: FORM_TITLE.to_string(),
            fields: FormField::ALL
                .iter()
                .map(|field| field_view(self, *field))
                .collect(),
            submit: SubmitButton {
                label: "Submit".to_string(),
                disabled: loading || registered,
                loading,
            },
            errors: self.errors().iter().map(|e| e.message.clone()).collect(),
            login_link: LinkView {
                prompt: "Already a user?".to_string(),
                label: "Login".to_string(),
                href: LOGIN_PATH.to_string(),
            },
            redirect: registered.then(|| HOME_PATH.to_string()),
        }
    }
}
