//! Authenticated user profile and login input.
//!
//! # Invariants
//! - `User` never carries a password; only the static credential table does.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Minimum accepted username length on the login form.
pub const MIN_USERNAME_CHARS: usize = 3;
/// Minimum accepted password length on the login form.
pub const MIN_PASSWORD_CHARS: usize = 6;

/// Stable numeric user identifier.
pub type UserId = u32;

/// Profile of a logged-in user, persisted as the session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl User {
    /// Key used to namespace this user's dashboard layout.
    pub fn layout_key(&self) -> String {
        self.id.to_string()
    }

    /// Upper-cased initials of the username words, e.g. `Demo User` -> `DU`.
    pub fn initials(&self) -> String {
        self.username
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// Username/password pair submitted by the login form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Checks the form rules before any credential lookup.
    ///
    /// # Errors
    /// - Returns the first failing field rule, username first.
    pub fn validate(&self) -> Result<(), CredentialsValidationError> {
        check_field("username", &self.username, MIN_USERNAME_CHARS)?;
        check_field("password", &self.password, MIN_PASSWORD_CHARS)?;
        Ok(())
    }
}

fn check_field(
    field: &'static str,
    value: &str,
    min_chars: usize,
) -> Result<(), CredentialsValidationError> {
    if value.is_empty() {
        return Err(CredentialsValidationError::Required { field });
    }
    let actual = value.chars().count();
    if actual < min_chars {
        return Err(CredentialsValidationError::TooShort {
            field,
            min_chars,
            actual,
        });
    }
    Ok(())
}

/// Login form rule violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    Required {
        field: &'static str,
    },
    TooShort {
        field: &'static str,
        min_chars: usize,
        actual: usize,
    },
}

impl Display for CredentialsValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required { field } => write!(f, "{} is required", capitalize(field)),
            Self::TooShort {
                field, min_chars, ..
            } => write!(
                f,
                "{} must be at least {min_chars} characters",
                capitalize(field)
            ),
        }
    }
}

impl Error for CredentialsValidationError {}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{CredentialsValidationError, LoginCredentials, User};

    #[test]
    fn validate_reports_username_before_password() {
        let err = LoginCredentials::new("", "").validate().unwrap_err();
        assert_eq!(err, CredentialsValidationError::Required { field: "username" });
        assert_eq!(err.to_string(), "Username is required");
    }

    #[test]
    fn validate_enforces_password_length() {
        let err = LoginCredentials::new("admin", "abc").validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Password must be at least 6 characters"
        );
    }

    #[test]
    fn initials_take_first_letter_of_each_word() {
        let user = User {
            id: 3,
            username: "demo user".to_string(),
            email: "demo@example.com".to_string(),
            role: "Demo User".to_string(),
        };
        assert_eq!(user.initials(), "DU");
        assert_eq!(user.layout_key(), "3");
    }
}
