//! Authentication service.
//!
//! Owns registered users, issued tokens and the current session. Passwords
//! are stored as hex-encoded SHA-256 digests; tokens are 32 bytes from the
//! OS random number generator, hex-encoded.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info};

/// Authentication failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("User {0} already exists")]
    UserExists(String),

    #[error("User {0} not found")]
    UserNotFound(String),

    #[error("Incorrect password")]
    IncorrectPassword,

    #[error("User is not authenticated")]
    NotAuthenticated,
}

/// Access role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
    Guest,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Guest => "guest",
        }
    }

    /// Fixed rights granted by the role.
    pub fn rights(&self) -> &'static [&'static str] {
        match self {
            Role::Admin => &["read", "write", "delete", "manage_users"],
            Role::User => &["read", "write"],
            Role::Guest => &["read"],
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered user.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub password_hash: String,
    pub role: Role,
    pub registered_at: DateTime<Utc>,
}

/// Users, tokens and the current session.
#[derive(Debug, Default)]
pub struct AuthStore {
    pub users: HashMap<String, UserRecord>,
    /// token -> username
    pub tokens: HashMap<String, String>,
    pub current_user: Option<String>,
}

/// Rights of the current session user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessReport {
    pub username: String,
    pub role: Role,
    pub rights: &'static [&'static str],
}

impl std::fmt::Display for AccessReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "User {} has role '{}' with rights: {}",
            self.username,
            self.role,
            self.rights.join(", ")
        )
    }
}

/// Injectable authentication service.
#[derive(Debug, Default)]
pub struct AuthService {
    store: Mutex<AuthStore>,
}

impl AuthService {
    /// Create a service with an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user with role `user`.
    pub fn register(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let mut store = self.store.lock();
        if store.users.contains_key(username) {
            return Err(AuthError::UserExists(username.to_string()));
        }
        store.users.insert(
            username.to_string(),
            UserRecord {
                password_hash: hash_password(password),
                role: Role::User,
                registered_at: Utc::now(),
            },
        );
        info!(username, "User registered");
        Ok(())
    }

    /// Verify credentials, issue a fresh token and open a session.
    pub fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let mut store = self.store.lock();
        let user = store
            .users
            .get(username)
            .ok_or_else(|| AuthError::UserNotFound(username.to_string()))?;
        if user.password_hash != hash_password(password) {
            debug!(username, "Password mismatch");
            return Err(AuthError::IncorrectPassword);
        }

        let token = generate_token();
        store.tokens.insert(token.clone(), username.to_string());
        store.current_user = Some(username.to_string());
        info!(username, "User logged in");
        Ok(token)
    }

    /// Rights of the current session user.
    pub fn check_rights(&self) -> Result<AccessReport, AuthError> {
        let store = self.store.lock();
        let username = store.current_user.as_ref().ok_or(AuthError::NotAuthenticated)?;
        let user = store
            .users
            .get(username)
            .ok_or_else(|| AuthError::UserNotFound(username.clone()))?;
        Ok(AccessReport {
            username: username.clone(),
            role: user.role,
            rights: user.role.rights(),
        })
    }

    /// Username a token was issued to.
    pub fn username_for_token(&self, token: &str) -> Option<String> {
        self.store.lock().tokens.get(token).cloned()
    }

    /// Change the role of a registered user.
    pub fn set_role(&self, username: &str, role: Role) -> Result<(), AuthError> {
        let mut store = self.store.lock();
        let user = store
            .users
            .get_mut(username)
            .ok_or_else(|| AuthError::UserNotFound(username.to_string()))?;
        user.role = role;
        Ok(())
    }

    /// Close the current session. Issued tokens stay valid.
    pub fn logout(&self) {
        let mut store = self.store.lock();
        if let Some(username) = store.current_user.take() {
            info!(username = %username, "User logged out");
        }
    }

    /// Username of the current session.
    pub fn current_user(&self) -> Option<String> {
        self.store.lock().current_user.clone()
    }

    /// Number of registered users.
    pub fn user_count(&self) -> usize {
        self.store.lock().users.len()
    }
}

fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
