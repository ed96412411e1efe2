//! HTTP handler modules.
//! Used by: server.

pub mod health;
pub mod login;
pub mod metrics;
pub mod whoami;

/// Header carrying the bearer token, on the login response and on protected
/// requests. The wire contract uses `Authentication`, not `Authorization`.
pub const AUTH_HEADER: &str = "authentication";
