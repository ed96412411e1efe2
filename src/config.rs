//! Process configuration, loaded once at startup.
//! Used by: main, state.

use crate::error::{Error, Result};
use crate::token::key::SigningKey;

pub const DEFAULT_TTL_SECONDS: i64 = 600;

#[derive(Debug)]
pub struct Config {
    pub signing_key: SigningKey,
    pub token_ttl_seconds: i64,
    pub bind_addr: String,
}

impl Config {
    /// Reads `SIGNING_KEY` (required), `TOKEN_TTL_SECONDS` (default 600) and
    /// `BIND_ADDR` (default 0.0.0.0:3000).
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("SIGNING_KEY")
            .map_err(|_| Error::Config("SIGNING_KEY must be set".into()))?;
        if secret.is_empty() {
            return Err(Error::Config("SIGNING_KEY must not be empty".into()));
        }

        let token_ttl_seconds = match std::env::var("TOKEN_TTL_SECONDS") {
            Ok(raw) => parse_ttl(&raw)?,
            Err(_) => DEFAULT_TTL_SECONDS,
        };

        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

        Ok(Self {
            signing_key: SigningKey::new(secret),
            token_ttl_seconds,
            bind_addr,
        })
    }

    pub fn for_tests() -> Self {
        Self {
            signing_key: SigningKey::new("test-signing-key"),
            token_ttl_seconds: DEFAULT_TTL_SECONDS,
            bind_addr: "127.0.0.1:0".into(),
        }
    }
}

fn parse_ttl(raw: &str) -> Result<i64> {
    let ttl: i64 = raw
        .parse()
        .map_err(|_| Error::Config(format!("TOKEN_TTL_SECONDS is not an integer: {}", raw)))?;
    if ttl < 1 {
        return Err(Error::Config("TOKEN_TTL_SECONDS must be at least 1".into()));
    }
    Ok(ttl)
}
