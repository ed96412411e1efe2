//! HMAC-SHA256 token issuance.
//! Used by: handlers::login.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{Error, Result};
use crate::token::claims::{Claims, Header, Identity};
use crate::token::key::SigningKey;

type HmacSha256 = Hmac<Sha256>;

/// Issues a signed bearer token for a verified identity.
///
/// Pure: `now` (epoch seconds) comes from the caller, the key is read-only,
/// and identical inputs produce identical tokens.
pub fn issue(identity: &Identity, key: &SigningKey, now: i64, ttl_seconds: i64) -> Result<String> {
    if identity.id <= 0 {
        return Err(Error::InvalidIdentity("id must be positive".into()));
    }
    if identity.username.is_empty() {
        return Err(Error::InvalidIdentity("username must not be empty".into()));
    }

    let claims = Claims::new(identity, now, ttl_seconds);
    let header = serde_json::to_vec(&Header::hs256())
        .map_err(|e| Error::SigningFailure(e.to_string()))?;
    let payload =
        serde_json::to_vec(&claims).map_err(|e| Error::SigningFailure(e.to_string()))?;

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header),
        URL_SAFE_NO_PAD.encode(payload)
    );
    let signature = mac_over(key, signing_input.as_bytes())?;

    Ok(format!(
        "{}.{}",
        signing_input,
        URL_SAFE_NO_PAD.encode(signature)
    ))
}

pub(crate) fn mac_over(key: &SigningKey, input: &[u8]) -> Result<Vec<u8>> {
    if key.is_empty() {
        return Err(Error::SigningFailure("signing key is empty".into()));
    }
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|e| Error::SigningFailure(e.to_string()))?;
    mac.update(input);
    Ok(mac.finalize().into_bytes().to_vec())
}
