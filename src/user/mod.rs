pub mod handle;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Days, Utc};
use serde::{Deserialize, Serialize};
use sha256::digest;

pub use clubhub_shared::user::*;

use crate::storage::Document;
use crate::Error;

/// Profile picture reference applied when none is supplied.
pub const DEFAULT_PROFILE_PIC: &str = "users/default-avatar";

/// Days a login token stays usable.
const TOKEN_EXPIRATION_DAYS: u64 = 30;

/// A registered user.
#[derive(Serialize, Deserialize, Debug)]
pub struct User {
    /// Identifier of this user, derived from the unique email.
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub profile_pic: String,
    pub registration_time: DateTime<Utc>,
    /// Hash of this user's password.
    pub password_sha: String,
    /// This user's token manager.
    pub tokens: Tokens,
}

impl Document for User {
    const NAME: &'static str = "users";

    #[inline]
    fn id(&self) -> u64 {
        self.id
    }
}

impl User {
    /// Create a user with the given plain-text password.
    pub fn new(
        name: String,
        email: String,
        password: &str,
        role: UserRole,
        profile_pic: Option<String>,
    ) -> Result<Self, Error> {
        if name.trim().is_empty() {
            return Err(Error::Validation("name must not be empty"));
        }
        if !email.contains('@') {
            return Err(Error::Validation("email address is malformed"));
        }
        if password.is_empty() {
            return Err(Error::Validation("password must not be empty"));
        }

        Ok(Self {
            id: id_for_email(&email),
            name,
            email,
            role,
            profile_pic: profile_pic.unwrap_or_else(|| DEFAULT_PROFILE_PIC.to_string()),
            registration_time: Utc::now(),
            password_sha: digest(password),
            tokens: Tokens::new(),
        })
    }

    /// Login into the account and return back a token in a `Result`.
    pub fn login(&mut self, password: &str) -> Result<String, Error> {
        if digest(password) == self.password_sha {
            Ok(self.tokens.new_token(self.id, TOKEN_EXPIRATION_DAYS))
        } else {
            Err(Error::UsernameOrPasswordIncorrect)
        }
    }

    /// Logout this account with the target token.
    pub fn logout(&mut self, token: &str) -> Result<(), Error> {
        if self.tokens.remove(token) {
            Ok(())
        } else {
            Err(Error::NotLoggedIn)
        }
    }

    /// Public view of this user, without the password digest.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            profile_pic: self.profile_pic.clone(),
            registration_time: self.registration_time,
        }
    }

    /// Case-insensitive substring match over name and email.
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query) || self.email.to_lowercase().contains(&query)
    }
}

/// Stable id derived from the unique email address, kept within
/// TOML's signed integer range.
pub fn id_for_email(email: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    email.hash(&mut hasher);
    hasher.finish() & (i64::MAX as u64)
}

/// A simple token manager.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct Tokens {
    inner: Vec<(DateTime<Utc>, String)>,
}

impl Tokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new token expiring after the given number of days.
    #[must_use]
    pub fn new_token(&mut self, id: u64, expire_days: u64) -> String {
        self.refresh();

        let expiry = Utc::now() + Days::new(expire_days);
        let token = digest(format!("{}-{}-{}", id, expiry, rand::random::<u64>()));
        self.inner.push((expiry, token.clone()));
        token
    }

    /// Remove a target token and return whether the token was removed.
    pub fn remove(&mut self, token: &str) -> bool {
        let len = self.inner.len();
        self.inner.retain(|entry| entry.1 != token);
        len > self.inner.len()
    }

    /// Check if a token is usable.
    pub fn token_usable(&self, token: &str) -> bool {
        let now = Utc::now();
        self.inner
            .iter()
            .any(|entry| entry.1 == token && entry.0 > now)
    }

    /// Remove expired tokens.
    pub fn refresh(&mut self) {
        let now = Utc::now();
        self.inner.retain(|entry| entry.0 > now);
    }
}
