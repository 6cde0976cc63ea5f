// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.
//!
//! Credential problems (missing header, bad or expired token, unknown
//! principal) never show up here: the authenticator absorbs them into an
//! anonymous request. These variants are what remains once a request has
//! to be rejected.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error type.
#[derive(Debug)]
pub enum AuthError {
    /// A principal is required but the request is anonymous
    Unauthorized,
    /// The presented refresh token is invalid, expired or not a refresh token
    InvalidRefreshToken,
    /// Login with an unknown email or a wrong password
    InvalidCredentials,
    /// The principal lookup backend failed
    LookupFailed(String),
    /// Token could not be issued
    InternalError(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Unauthorized => "unauthorized",
            AuthError::InvalidRefreshToken => "invalid_refresh_token",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::LookupFailed(_) => "principal_lookup_failed",
            AuthError::InternalError(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Unauthorized
            | AuthError::InvalidRefreshToken
            | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::LookupFailed(_) | AuthError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::Unauthorized => write!(f, "You are not authorized to perform operations"),
            AuthError::InvalidRefreshToken => write!(f, "Invalid token or has expired"),
            AuthError::InvalidCredentials => write!(f, "invalid credentials"),
            AuthError::LookupFailed(msg) => write!(f, "Failed to resolve principal: {msg}"),
            AuthError::InternalError(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<super::authenticator::LookupError> for AuthError {
    fn from(err: super::authenticator::LookupError) -> Self {
        AuthError::LookupFailed(err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn unauthorized_returns_401() {
        let response = AuthError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error_code"], "unauthorized");
        assert_eq!(body["error"], "You are not authorized to perform operations");
    }

    #[tokio::test]
    async fn invalid_credentials_returns_401() {
        let response = AuthError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error_code"], "invalid_credentials");
        assert_eq!(body["error"], "invalid credentials");
    }

    #[tokio::test]
    async fn lookup_failure_returns_500() {
        let response = AuthError::LookupFailed("db down".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
