use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::error_response;

/// Why a request was refused before it reached the session.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingHeader,
    #[error("Invalid Authorization header")]
    MalformedHeader,
    #[error("Authorization must use Bearer token")]
    NotBearer,
    #[error("Invalid auth token")]
    TokenMismatch,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        error_response(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", self.to_string())
    }
}

/// Checks the bearer token against the session's opaque auth token.
pub fn verify_bearer(headers: &HeaderMap, session_token: &str) -> Result<(), AuthError> {
    if bearer_token(headers)?.trim() != session_token {
        return Err(AuthError::TokenMismatch);
    }
    Ok(())
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?
        .strip_prefix("Bearer ")
        .ok_or(AuthError::NotBearer)
}
