//! Credential verification seam.
//! Used by: handlers::login, state.
//!
//! The token components only ever see a verified [`Identity`]; checking a
//! username/password pair against real credential storage is the injected
//! authenticator's job. [`StaticAuthenticator`] is the in-process stand-in,
//! seeded from configuration.

use crate::error::{Error, Result};
use crate::token::claims::Identity;

pub trait Authenticator: Send + Sync {
    /// Returns the verified identity for a credential pair, or
    /// `InvalidCredentials`.
    fn authenticate(&self, username: &str, password: &str) -> Result<Identity>;
}

struct StaticUser {
    id: i64,
    username: String,
    password: String,
}

/// Fixed in-memory user table. Holds plain credentials; real deployments
/// replace this with an authenticator backed by a credential store.
pub struct StaticAuthenticator {
    users: Vec<StaticUser>,
}

impl StaticAuthenticator {
    pub fn new() -> Self {
        Self { users: Vec::new() }
    }

    pub fn with_user(mut self, id: i64, username: &str, password: &str) -> Self {
        self.users.push(StaticUser {
            id,
            username: username.to_owned(),
            password: password.to_owned(),
        });
        self
    }

    /// Seeds from `AUTH_USERS` (`id:username:password` entries separated by
    /// commas). An unset variable yields an empty table, so every login
    /// fails until users are configured.
    pub fn from_env() -> Self {
        match std::env::var("AUTH_USERS") {
            Ok(raw) => {
                let authenticator = Self::from_spec(&raw);
                tracing::info!(users = authenticator.users.len(), "seeded authenticator");
                authenticator
            }
            Err(_) => {
                tracing::warn!("AUTH_USERS not set; all logins will be rejected");
                Self::new()
            }
        }
    }

    fn from_spec(raw: &str) -> Self {
        let mut authenticator = Self::new();
        for entry in raw.split(',').filter(|e| !e.trim().is_empty()) {
            match parse_user(entry.trim()) {
                Some(user) => authenticator.users.push(user),
                None => tracing::warn!(entry = %entry.trim(), "skipping malformed AUTH_USERS entry"),
            }
        }
        authenticator
    }
}

fn parse_user(entry: &str) -> Option<StaticUser> {
    let (id, rest) = entry.split_once(':')?;
    let (username, password) = rest.split_once(':')?;
    let id: i64 = id.trim().parse().ok()?;
    if id <= 0 || username.is_empty() || password.is_empty() {
        return None;
    }
    Some(StaticUser {
        id,
        username: username.to_owned(),
        password: password.to_owned(),
    })
}

impl Authenticator for StaticAuthenticator {
    fn authenticate(&self, username: &str, password: &str) -> Result<Identity> {
        self.users
            .iter()
            .find(|u| u.username == username && u.password == password)
            .map(|u| Identity {
                id: u.id,
                username: u.username.clone(),
            })
            .ok_or(Error::InvalidCredentials)
    }
}
