//! Token issuance and verification.
//! Used by: handlers, state.

pub mod claims;
pub mod key;
pub mod sign;
pub mod verify;
