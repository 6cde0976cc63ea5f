// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token endpoints.

use axum::{extract::State, Json};

use crate::{
    auth::{token::principal_claims, AuthError, TokenCodec},
    models::{AccessTokenResponse, LoginRequest, LoginResponse, RefreshRequest, TokenPair},
    state::AppState,
};

/// Issue an access/refresh pair for a principal.
pub fn issue_token_pair(codec: &TokenCodec, principal_id: &str) -> Result<TokenPair, AuthError> {
    Ok(TokenPair {
        access: codec.issue_access(principal_claims(principal_id))?,
        refresh: codec.issue_refresh(principal_claims(principal_id))?,
    })
}

/// Log in with email and password.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Access/refresh pair and the principal", body = LoginResponse),
        (status = 401, description = "Unknown email or wrong password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let principal = state
        .credentials
        .verify_credentials(&request.email, &request.password)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let TokenPair { access, refresh } = issue_token_pair(&state.tokens, &principal.id)?;
    tracing::info!(principal_id = %principal.id, "principal logged in");

    Ok(Json(LoginResponse {
        access,
        refresh,
        user: principal,
    }))
}

/// Exchange a refresh token for a new access token.
#[utoipa::path(
    post,
    path = "/v1/auth/refresh",
    request_body = RefreshRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "New access token", body = AccessTokenResponse),
        (status = 401, description = "Invalid, expired or non-refresh token")
    )
)]
pub async fn refresh_access(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<AccessTokenResponse>, AuthError> {
    let access = state.tokens.exchange_refresh(&request.refresh)?;
    Ok(Json(AccessTokenResponse { access }))
}

/// Development-only token minting for principals already in the store.
///
/// MUST NOT be compiled into production builds.
#[cfg(feature = "dev")]
pub async fn dev_issue_tokens(
    State(state): State<AppState>,
    Json(request): Json<DevTokenRequest>,
) -> Result<Json<TokenPair>, crate::error::ApiError> {
    if state
        .store
        .read()
        .await
        .principal_by_id(&request.principal_id)
        .is_none()
    {
        return Err(crate::error::ApiError::new(
            axum::http::StatusCode::NOT_FOUND,
            "Principal not found",
        ));
    }
    tracing::warn!(principal_id = %request.principal_id, "issuing development tokens");
    Ok(Json(issue_token_pair(&state.tokens, &request.principal_id)?))
}

#[cfg(feature = "dev")]
#[derive(Debug, serde::Deserialize)]
pub struct DevTokenRequest {
    pub principal_id: String,
}
