//! Process-wide signing secret.
//! Used by: token::sign, token::verify, config, state.

use std::fmt;

/// Shared MAC secret, loaded once at startup and constant for the process
/// lifetime. The raw secret bytes are the key material; no re-encoding.
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self(secret.as_ref().to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Keeps the secret out of logs and panic messages.
impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningKey").field(&"[redacted]").finish()
    }
}
