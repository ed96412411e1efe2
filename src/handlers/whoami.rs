//! Protected endpoint: verifies the presented bearer token.
//! Used by: server.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::handlers::AUTH_HEADER;
use crate::state::AppState;
use crate::token::verify::verify;

#[derive(Serialize)]
pub struct WhoamiResponse {
    pub id: i64,
    pub username: String,
}

fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    headers
        .get(AUTH_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or(Error::MissingToken)
}

pub async fn whoami(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<WhoamiResponse>> {
    let token = bearer_token(&headers)?;
    let now = Utc::now().timestamp();

    let identity = match verify(token, &state.signing_key, now) {
        Ok(identity) => identity,
        Err(e) => {
            state.metrics.record_reject();
            tracing::info!(error = %e, "token rejected");
            return Err(e);
        }
    };

    state.metrics.record_verify();
    Ok(Json(WhoamiResponse {
        id: identity.id,
        username: identity.username,
    }))
}
