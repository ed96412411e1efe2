//! Unified error types for tokenbooth.
//! Used by: token, auth, config, handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("signing failure: {0}")]
    SigningFailure(String),

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("bad signature")]
    BadSignature,

    #[error("token expired")]
    Expired,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("config error: {0}")]
    Config(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Malformed(_)
            | Error::BadSignature
            | Error::Expired
            | Error::InvalidCredentials
            | Error::MissingToken => StatusCode::UNAUTHORIZED,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::InvalidIdentity(_) | Error::SigningFailure(_) | Error::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
