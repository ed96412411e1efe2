//! HMAC-SHA256 token verification.
//! Used by: handlers::whoami.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{Error, Result};
use crate::token::claims::{Claims, Header, Identity, ALGORITHM};
use crate::token::key::SigningKey;

type HmacSha256 = Hmac<Sha256>;

/// Verifies a presented token and recovers the identity it was issued for.
///
/// Pure decision function over (token, key, now): structural checks first,
/// then the signature in constant time, then claims and expiry. `now` is a
/// caller-supplied epoch-seconds clock reading.
pub fn verify(token: &str, key: &SigningKey, now: i64) -> Result<Identity> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(Error::Malformed(
            "expected three dot-separated segments".into(),
        ));
    }
    let (header_b64, payload_b64, signature_b64) = (parts[0], parts[1], parts[2]);

    let header_bytes = URL_SAFE_NO_PAD
        .decode(header_b64)
        .map_err(|e| Error::Malformed(format!("header: {}", e)))?;
    let header: Header = serde_json::from_slice(&header_bytes)
        .map_err(|e| Error::Malformed(format!("header: {}", e)))?;
    if header.alg != ALGORITHM {
        return Err(Error::Malformed(format!(
            "unsupported algorithm: {}",
            header.alg
        )));
    }

    let payload_bytes = URL_SAFE_NO_PAD
        .decode(payload_b64)
        .map_err(|e| Error::Malformed(format!("payload: {}", e)))?;
    let signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|e| Error::Malformed(format!("signature: {}", e)))?;

    // The signed input is the token up to the last dot, exactly as presented.
    let signing_input = &token[..header_b64.len() + 1 + payload_b64.len()];
    let mut mac =
        HmacSha256::new_from_slice(key.as_bytes()).map_err(|_| Error::BadSignature)?;
    mac.update(signing_input.as_bytes());
    mac.verify_slice(&signature).map_err(|_| Error::BadSignature)?;

    let claims: Claims = serde_json::from_slice(&payload_bytes)
        .map_err(|e| Error::Malformed(format!("claims: {}", e)))?;
    if claims.is_expired(now) {
        return Err(Error::Expired);
    }

    Ok(claims.identity())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::sign::{issue, mac_over};

    const TTL: i64 = 600;

    fn alice() -> Identity {
        Identity {
            id: 1,
            username: "alice".into(),
        }
    }

    fn key() -> SigningKey {
        SigningKey::new("secret")
    }

    // Replaces the first character of one segment with a different base64url
    // character, so the segment still decodes but carries different bytes.
    fn tamper_segment(token: &str, index: usize) -> String {
        let mut parts: Vec<String> = token.split('.').map(str::to_owned).collect();
        let replacement = if parts[index].starts_with('A') { "B" } else { "A" };
        parts[index].replace_range(..1, replacement);
        parts.join(".")
    }

    #[test]
    fn round_trip_recovers_the_identity() -> Result<()> {
        let token = issue(&alice(), &key(), 1000, TTL)?;
        assert_eq!(verify(&token, &key(), 1000)?, alice());
        Ok(())
    }

    #[test]
    fn worked_example_from_the_wire_contract() -> Result<()> {
        let token = issue(&alice(), &key(), 1000, TTL)?;
        assert_eq!(verify(&token, &key(), 1500)?, alice());
        assert!(matches!(verify(&token, &key(), 1601), Err(Error::Expired)));
        Ok(())
    }

    #[test]
    fn expiry_is_strict_at_the_boundary() -> Result<()> {
        let token = issue(&alice(), &key(), 1000, TTL)?;
        assert!(verify(&token, &key(), 1599).is_ok());
        assert!(matches!(verify(&token, &key(), 1600), Err(Error::Expired)));
        assert!(matches!(
            verify(&token, &key(), 1000 + TTL + 1),
            Err(Error::Expired)
        ));
        Ok(())
    }

    #[test]
    fn tampered_signature_rejected() -> Result<()> {
        let token = issue(&alice(), &key(), 1000, TTL)?;
        let tampered = tamper_segment(&token, 2);
        let result = verify(&tampered, &key(), 1000);
        assert!(matches!(result, Err(Error::BadSignature)));
        Ok(())
    }

    #[test]
    fn tampered_payload_rejected() -> Result<()> {
        let token = issue(&alice(), &key(), 1000, TTL)?;
        let tampered = tamper_segment(&token, 1);
        let result = verify(&tampered, &key(), 1000);
        assert!(matches!(result, Err(Error::BadSignature)));
        Ok(())
    }

    #[test]
    fn wrong_key_rejected() -> Result<()> {
        let token = issue(&alice(), &key(), 1000, TTL)?;
        let result = verify(&token, &SigningKey::new("other-secret"), 1000);
        assert!(matches!(result, Err(Error::BadSignature)));
        Ok(())
    }

    #[test]
    fn expired_and_tampered_reports_bad_signature() -> Result<()> {
        let token = issue(&alice(), &key(), 1000, TTL)?;
        let tampered = tamper_segment(&token, 2);
        let result = verify(&tampered, &key(), 5000);
        assert!(matches!(result, Err(Error::BadSignature)));
        Ok(())
    }

    #[test]
    fn empty_string_is_malformed() {
        let result = verify("", &key(), 1000);
        assert!(matches!(result, Err(Error::Malformed(_))));
    }

    #[test]
    fn wrong_segment_count_is_malformed() -> Result<()> {
        let token = issue(&alice(), &key(), 1000, TTL)?;
        let four_segments = format!("{}.extra", token);
        for candidate in ["no-dots-here", "a.b", four_segments.as_str()] {
            let result = verify(candidate, &key(), 1000);
            assert!(matches!(result, Err(Error::Malformed(_))));
        }
        Ok(())
    }

    #[test]
    fn non_base64url_segments_are_malformed() {
        for candidate in ["!!!.b.c", "a.!!!.c", "a.b.!!!"] {
            let result = verify(candidate, &key(), 1000);
            assert!(matches!(result, Err(Error::Malformed(_))));
        }
    }

    #[test]
    fn unsupported_algorithm_is_malformed() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let token = format!("{}.{}.{}", header, header, header);
        let result = verify(&token, &key(), 1000);
        assert!(matches!(result, Err(Error::Malformed(_))));
    }

    // A correctly signed token whose payload is not claims JSON still fails
    // closed as malformed after the signature check.
    #[test]
    fn signed_junk_payload_is_malformed() -> Result<()> {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(b"not claims");
        let signing_input = format!("{}.{}", header, payload);
        let signature = mac_over(&key(), signing_input.as_bytes())?;
        let token = format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature));
        let result = verify(&token, &key(), 1000);
        assert!(matches!(result, Err(Error::Malformed(_))));
        Ok(())
    }

    #[test]
    fn known_good_token_verifies_cross_implementation() -> Result<()> {
        let token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
                     eyJzdWIiOiJ0b2tlbmJvb3RoIiwiaWQiOjEsInVzZXJuYW1lIjoiYWxpY2UiLCJpYXQiOjEwMDAsImV4cCI6MTYwMH0.\
                     YBHivS7O-Z4upJvayXVgbA0G1tQ6dXp90DCCNCAA-qs";
        assert_eq!(verify(token, &key(), 1500)?, alice());
        Ok(())
    }
}
