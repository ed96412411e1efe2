//! Identity and the claims carried by issued tokens.
//! Used by: token::sign, token::verify, auth, handlers::login.

use serde::{Deserialize, Serialize};

/// Fixed subject label stamped into every issued token.
pub const TOKEN_SUBJECT: &str = "tokenbooth";

/// The only signing algorithm this service issues or accepts.
pub const ALGORITHM: &str = "HS256";

/// A verified user, as produced by the authenticator. Not retained by the
/// token components beyond a single call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: i64,
    pub username: String,
}

/// Wire header of the signed token (first segment).
#[derive(Debug, Serialize, Deserialize)]
pub struct Header {
    pub alg: String,
    pub typ: String,
}

impl Header {
    pub fn hs256() -> Self {
        Self {
            alg: ALGORITHM.into(),
            typ: "JWT".into(),
        }
    }
}

/// Wire payload of the signed token (second segment). Timestamps are epoch
/// seconds. Field order is the wire order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub id: i64,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// `now` is a caller-supplied clock reading; the token components never
    /// read the clock themselves.
    pub fn new(identity: &Identity, now: i64, ttl_seconds: i64) -> Self {
        Self {
            sub: TOKEN_SUBJECT.into(),
            id: identity.id,
            username: identity.username.clone(),
            iat: now,
            exp: now + ttl_seconds,
        }
    }

    /// Strict: a token is already expired at exactly `exp`.
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.exp
    }

    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            username: self.username.clone(),
        }
    }
}
