//! Shared application state.

use std::sync::Arc;

use crate::auth::{Authenticator, StaticAuthenticator};
use crate::config::Config;
use crate::telemetry::Metrics;
use crate::token::key::SigningKey;

pub struct AppStateInner {
    pub signing_key: SigningKey,
    pub token_ttl_seconds: i64,
    pub authenticator: Box<dyn Authenticator>,
    pub metrics: Metrics,
}

pub type AppState = Arc<AppStateInner>;

pub fn build_state(config: Config, authenticator: Box<dyn Authenticator>) -> AppState {
    Arc::new(AppStateInner {
        signing_key: config.signing_key,
        token_ttl_seconds: config.token_ttl_seconds,
        authenticator,
        metrics: Metrics::new(),
    })
}

pub fn build_test_state() -> AppState {
    let authenticator = StaticAuthenticator::new()
        .with_user(1, "alice", "wonderland")
        .with_user(2, "bob", "builder");
    build_state(Config::for_tests(), Box::new(authenticator))
}
