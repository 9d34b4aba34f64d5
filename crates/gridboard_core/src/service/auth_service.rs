//! Demo authentication over a static credential table.
//!
//! # Responsibility
//! - Match login credentials against the built-in demo accounts.
//! - Persist and restore the logged-in profile through the key-value store.
//!
//! # Invariants
//! - Passwords never leave this module; only `User` profiles are stored.
//! - A stored session that fails to decode is removed, never trusted.
//! - Storage failures degrade to in-memory sessions; they never fail login.

use crate::model::user::{CredentialsValidationError, LoginCredentials, User, UserId};
use crate::storage::KeyValueStore;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Key holding the serialized logged-in profile.
pub const SESSION_STORAGE_KEY: &str = "currentUser";

struct DemoAccount {
    id: UserId,
    username: &'static str,
    password: &'static str,
    email: &'static str,
    role: &'static str,
}

impl DemoAccount {
    fn profile(&self) -> User {
        User {
            id: self.id,
            username: self.username.to_string(),
            email: self.email.to_string(),
            role: self.role.to_string(),
        }
    }
}

const DEMO_ACCOUNTS: &[DemoAccount] = &[
    DemoAccount {
        id: 1,
        username: "admin",
        password: "admin123",
        email: "admin@example.com",
        role: "Administrator",
    },
    DemoAccount {
        id: 2,
        username: "user1",
        password: "user123",
        email: "user1@example.com",
        role: "User",
    },
    DemoAccount {
        id: 3,
        username: "demo",
        password: "demo123",
        email: "demo@example.com",
        role: "Demo User",
    },
];

/// Login failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Form rules rejected the input before lookup.
    Validation(CredentialsValidationError),
    InvalidCredentials,
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidCredentials => write!(f, "Invalid username or password"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::InvalidCredentials => None,
        }
    }
}

impl From<CredentialsValidationError> for AuthError {
    fn from(value: CredentialsValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Username and role of one demo account, for the login screen hint list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoCredential {
    pub username: &'static str,
    pub role: &'static str,
}

/// Session holder for the dashboard.
pub struct AuthService<S: KeyValueStore> {
    store: S,
    current_user: Option<User>,
}

impl<S: KeyValueStore> AuthService<S> {
    /// Creates the service and restores a stored session when one decodes.
    pub fn new(store: S) -> Self {
        let current_user = restore_session(&store);
        Self {
            store,
            current_user,
        }
    }

    /// Validates form input and logs in on an exact username/password match.
    ///
    /// # Errors
    /// - `AuthError::Validation` when a form rule fails.
    /// - `AuthError::InvalidCredentials` when no account matches.
    pub fn login(&mut self, credentials: &LoginCredentials) -> Result<User, AuthError> {
        credentials.validate()?;

        let account = DEMO_ACCOUNTS.iter().find(|account| {
            account.username == credentials.username && account.password == credentials.password
        });
        let user = match account {
            Some(account) => account.profile(),
            None => {
                info!("event=login module=auth status=rejected reason=invalid_credentials");
                return Err(AuthError::InvalidCredentials);
            }
        };

        match serde_json::to_string(&user) {
            Ok(encoded) => {
                if let Err(err) = self.store.set(SESSION_STORAGE_KEY, &encoded) {
                    warn!("event=session_save module=auth status=skipped error={err}");
                }
            }
            Err(err) => warn!("event=session_save module=auth status=error error={err}"),
        }

        info!("event=login module=auth status=ok user_id={}", user.id);
        self.current_user = Some(user.clone());
        Ok(user)
    }

    /// Clears the session in memory and in storage.
    pub fn logout(&mut self) {
        if let Err(err) = self.store.remove(SESSION_STORAGE_KEY) {
            warn!("event=session_clear module=auth status=skipped error={err}");
        }
        if let Some(user) = self.current_user.take() {
            info!("event=logout module=auth status=ok user_id={}", user.id);
        }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    /// Demo accounts offered on the login screen.
    pub fn demo_credentials(&self) -> Vec<DemoCredential> {
        DEMO_ACCOUNTS
            .iter()
            .map(|account| DemoCredential {
                username: account.username,
                role: account.role,
            })
            .collect()
    }
}

fn restore_session(store: &impl KeyValueStore) -> Option<User> {
    let raw = match store.get(SESSION_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            warn!("event=session_restore module=auth status=skipped error={err}");
            return None;
        }
    };

    match serde_json::from_str::<User>(&raw) {
        Ok(user) => {
            info!("event=session_restore module=auth status=ok user_id={}", user.id);
            Some(user)
        }
        Err(err) => {
            warn!("event=session_restore module=auth status=discarded error={err}");
            if let Err(err) = store.remove(SESSION_STORAGE_KEY) {
                warn!("event=session_clear module=auth status=skipped error={err}");
            }
            None
        }
    }
}
