//! Login endpoint: credential check and token issuance.
//! Used by: server.

use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::handlers::AUTH_HEADER;
use crate::state::AppState;
use crate::token::sign::issue;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: i64,
}

fn validate_request(req: &LoginRequest) -> Result<()> {
    if req.username.is_empty() || req.username.len() > 256 {
        return Err(Error::Validation("username must be 1-256 characters".into()));
    }
    if req.username.chars().any(|c| c.is_control()) {
        return Err(Error::Validation("username contains control characters".into()));
    }
    if req.password.is_empty() || req.password.len() > 1024 {
        return Err(Error::Validation("password must be 1-1024 characters".into()));
    }
    Ok(())
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<LoginResponse>)> {
    validate_request(&req)?;

    let identity = match state.authenticator.authenticate(&req.username, &req.password) {
        Ok(identity) => identity,
        Err(e) => {
            state.metrics.record_login_rejected();
            tracing::info!(username = %req.username, "login rejected");
            return Err(e);
        }
    };

    let now = Utc::now().timestamp();
    let token = issue(&identity, &state.signing_key, now, state.token_ttl_seconds)?;
    let expires_at = now + state.token_ttl_seconds;

    let mut headers = HeaderMap::new();
    let header_val = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|e| Error::SigningFailure(e.to_string()))?;
    headers.insert(AUTH_HEADER, header_val);

    tracing::info!(id = identity.id, username = %identity.username, "token issued");
    state.metrics.record_issue();

    Ok((headers, Json(LoginResponse { token, expires_at })))
}
