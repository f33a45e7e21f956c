use std::collections::BTreeMap;

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::permissions::Role;

/// The bootstrap administrator account. It cannot be removed.
pub const PRIMARY_ADMIN: &str = "admin";

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("unknown user {0:?}")]
    UnknownUser(String),
    #[error("user {0:?} already exists")]
    DuplicateUser(String),
    #[error("user {0:?} is deactivated")]
    Inactive(String),
    #[error("invalid password")]
    BadPassword,
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,
    #[error("the primary admin account cannot be removed")]
    ProtectedUser,
    #[error("password hashing failed: {0}")]
    Hash(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub role: Role,
    pub active: bool,
    #[serde(rename = "passwordHash")]
    password_hash: String,
}

/// Named users with Argon2-hashed passwords and a role each. The store is
/// a value; persistence is the caller's concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserStore {
    users: BTreeMap<String, User>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The three accounts the club starts with. Passwords are meant to be
    /// changed on first login.
    pub fn with_defaults() -> Result<Self, AuthError> {
        let mut store = Self::new();
        store.add_user(PRIMARY_ADMIN, "Head Administrator", Role::Admin, "admin123")?;
        store.add_user("coach", "Head Coach", Role::Coach, "coach123")?;
        store.add_user("assistant", "Assistant", Role::Assistant, "assistant123")?;
        Ok(store)
    }

    pub fn add_user(
        &mut self,
        username: &str,
        name: &str,
        role: Role,
        password: &str,
    ) -> Result<(), AuthError> {
        if self.users.contains_key(username) {
            return Err(AuthError::DuplicateUser(username.to_string()));
        }
        let password_hash = hash_password(password)?;
        self.users.insert(
            username.to_string(),
            User {
                name: name.to_string(),
                role,
                active: true,
                password_hash,
            },
        );
        info!(user = username, %role, "user added");
        Ok(())
    }

    /// Check a password and return the user's role. Deactivated users fail
    /// verification regardless of password.
    pub fn verify(&self, username: &str, password: &str) -> Result<Role, AuthError> {
        let user = self
            .users
            .get(username)
            .ok_or_else(|| AuthError::UnknownUser(username.to_string()))?;
        if !user.active {
            return Err(AuthError::Inactive(username.to_string()));
        }
        let parsed = PasswordHash::new(&user.password_hash)
            .map_err(|e| AuthError::Hash(e.to_string()))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| AuthError::BadPassword)?;
        Ok(user.role)
    }

    pub fn change_password(&mut self, username: &str, new_password: &str) -> Result<(), AuthError> {
        let hash = hash_password(new_password)?;
        let user = self
            .users
            .get_mut(username)
            .ok_or_else(|| AuthError::UnknownUser(username.to_string()))?;
        user.password_hash = hash;
        info!(user = username, "password changed");
        Ok(())
    }

    pub fn update_user(
        &mut self,
        username: &str,
        name: &str,
        role: Role,
        active: bool,
    ) -> Result<(), AuthError> {
        let user = self
            .users
            .get_mut(username)
            .ok_or_else(|| AuthError::UnknownUser(username.to_string()))?;
        user.name = name.to_string();
        user.role = role;
        user.active = active;
        Ok(())
    }

    pub fn remove_user(&mut self, username: &str) -> Result<User, AuthError> {
        if username == PRIMARY_ADMIN {
            return Err(AuthError::ProtectedUser);
        }
        let user = self
            .users
            .remove(username)
            .ok_or_else(|| AuthError::UnknownUser(username.to_string()))?;
        info!(user = username, "user removed");
        Ok(user)
    }

    pub fn get(&self, username: &str) -> Option<&User> {
        self.users.get(username)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &User)> {
        self.users.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AuthError::PasswordTooShort);
    }
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}
