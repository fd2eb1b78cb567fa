//! Login and registration form validation.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::FieldError;

pub const PASSWORD_MIN_LENGTH: usize = 6;
pub const DISPLAY_NAME_MIN_LENGTH: usize = 2;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthField {
    Name,
    Email,
    Password,
    ConfirmPassword,
}

impl AuthField {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthField::Name => "name",
            AuthField::Email => "email",
            AuthField::Password => "password",
            AuthField::ConfirmPassword => "confirmPassword",
        }
    }
}

pub type AuthErrors = BTreeMap<AuthField, FieldError>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> AuthErrors {
        let mut errors = AuthErrors::new();
        if let Some(err) = email(&self.email) {
            errors.insert(AuthField::Email, err);
        }
        if let Some(err) = password(&self.password) {
            errors.insert(AuthField::Password, err);
        }
        errors
    }

    pub fn is_submittable(&self) -> bool {
        self.validate().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> AuthErrors {
        let mut errors = AuthErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.insert(AuthField::Name, FieldError::Required);
        } else if name.chars().count() < DISPLAY_NAME_MIN_LENGTH {
            errors.insert(
                AuthField::Name,
                FieldError::TooShort {
                    min: DISPLAY_NAME_MIN_LENGTH,
                },
            );
        }

        if let Some(err) = email(&self.email) {
            errors.insert(AuthField::Email, err);
        }
        if let Some(err) = password(&self.password) {
            errors.insert(AuthField::Password, err);
        }

        if self.confirm_password.is_empty() {
            errors.insert(AuthField::ConfirmPassword, FieldError::Required);
        } else if self.confirm_password != self.password {
            errors.insert(AuthField::ConfirmPassword, FieldError::Mismatch);
        }

        errors
    }

    pub fn is_submittable(&self) -> bool {
        self.validate().is_empty()
    }
}

fn email(value: &str) -> Option<FieldError> {
    let value = value.trim();
    if value.is_empty() {
        Some(FieldError::Required)
    } else if !EMAIL.is_match(value) {
        Some(FieldError::InvalidEmail)
    } else {
        None
    }
}

fn password(value: &str) -> Option<FieldError> {
    if value.is_empty() {
        Some(FieldError::Required)
    } else if value.chars().count() < PASSWORD_MIN_LENGTH {
        Some(FieldError::TooShort {
            min: PASSWORD_MIN_LENGTH,
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_requires_both_fields() {
        let errors = LoginForm::default().validate();
        assert_eq!(errors.get(&AuthField::Email), Some(&FieldError::Required));
        assert_eq!(errors.get(&AuthField::Password), Some(&FieldError::Required));
    }

    #[test]
    fn login_email_shape() {
        for bad in ["cook", "cook@kitchen", "cook @kitchen.com", "@kitchen.com"] {
            let form = LoginForm {
                email: bad.to_string(),
                password: "secret1".to_string(),
            };
            assert_eq!(
                form.validate().get(&AuthField::Email),
                Some(&FieldError::InvalidEmail),
                "{}",
                bad
            );
        }

        let form = LoginForm {
            email: "cook@kitchen.com".to_string(),
            password: "secret1".to_string(),
        };
        assert!(form.is_submittable());
    }

    #[test]
    fn short_password() {
        let form = LoginForm {
            email: "cook@kitchen.com".to_string(),
            password: "12345".to_string(),
        };
        assert_eq!(
            form.validate().get(&AuthField::Password),
            Some(&FieldError::TooShort { min: 6 })
        );
    }

    #[test]
    fn register_checks_name_and_confirmation() {
        let mut form = RegisterForm {
            name: " a ".to_string(),
            email: "cook@kitchen.com".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret2".to_string(),
        };
        let errors = form.validate();
        assert_eq!(errors.get(&AuthField::Name), Some(&FieldError::TooShort { min: 2 }));
        assert_eq!(
            errors.get(&AuthField::ConfirmPassword),
            Some(&FieldError::Mismatch)
        );
        assert_eq!(
            FieldError::Mismatch.message_key(AuthField::ConfirmPassword.as_str()),
            "validation.confirmPassword.noMatch"
        );

        form.name = "Ana".to_string();
        form.confirm_password = "secret1".to_string();
        assert!(form.is_submittable());
    }
}
