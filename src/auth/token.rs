// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signed, typed, expiring tokens.
//!
//! Tokens are HS256 JWTs over the process-wide secret. The claim shape is
//!
//! ```text
//! { "exp": <epoch seconds>, "type": "access" | "refresh", "user_id": ..., ...caller claims }
//! ```
//!
//! [`TokenCodec::verify`] returns `None` for every kind of failure. Callers
//! cannot tell a tampered token from an expired one, and that is intended.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::AuthError;
use crate::config::{AppConfig, TokenSecret};

/// Claim carrying the principal identifier.
pub const PRINCIPAL_ID_CLAIM: &str = "user_id";

const EXPIRY_CLAIM: &str = "exp";
const TYPE_CLAIM: &str = "type";

/// Token kind, stored in the `type` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived credential presented on every request
    Access,
    /// Long-lived credential only good for minting new access tokens
    Refresh,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenType::Access => write!(f, "access"),
            TokenType::Refresh => write!(f, "refresh"),
        }
    }
}

/// Decoded token claims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiration timestamp (Unix seconds)
    pub exp: i64,

    /// Access or refresh
    #[serde(rename = "type")]
    pub token_type: TokenType,

    /// Caller-supplied claims
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenClaims {
    /// The principal identifier, if the token carries one.
    ///
    /// Numeric identifiers are accepted and rendered as strings.
    pub fn principal_id(&self) -> Option<String> {
        match self.extra.get(PRINCIPAL_ID_CLAIM)? {
            Value::String(id) if !id.is_empty() => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }
}

/// Claims map identifying a principal, suitable for [`TokenCodec::issue`].
pub fn principal_claims(principal_id: &str) -> Map<String, Value> {
    let mut claims = Map::new();
    claims.insert(
        PRINCIPAL_ID_CLAIM.to_string(),
        Value::String(principal_id.to_string()),
    );
    claims
}

/// Issues and verifies tokens with the process-wide secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl_minutes: i64,
    refresh_ttl_minutes: i64,
}

impl TokenCodec {
    /// Create a codec with the default access (24h) and refresh (7 days) lifetimes.
    pub fn new(secret: &TokenSecret) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is compared against the current time with no grace period.
        validation.leeway = 0;
        validation.validate_aud = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_ttl_minutes: crate::config::DEFAULT_ACCESS_TTL_MINUTES,
            refresh_ttl_minutes: crate::config::DEFAULT_REFRESH_TTL_MINUTES,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.token_secret)
            .with_ttls(config.access_ttl_minutes, config.refresh_ttl_minutes)
    }

    /// Override the preset lifetimes used by `issue_access` and `issue_refresh`.
    pub fn with_ttls(mut self, access_minutes: i64, refresh_minutes: i64) -> Self {
        self.access_ttl_minutes = access_minutes;
        self.refresh_ttl_minutes = refresh_minutes;
        self
    }

    /// Issue a signed token that expires `ttl_minutes` from now.
    ///
    /// `exp` and `type` are set by the codec; caller claims with those names
    /// are discarded.
    pub fn issue(
        &self,
        claims: Map<String, Value>,
        ttl_minutes: i64,
        token_type: TokenType,
    ) -> Result<String, AuthError> {
        let mut extra = claims;
        extra.remove(EXPIRY_CLAIM);
        extra.remove(TYPE_CLAIM);

        let exp = ttl_minutes
            .checked_mul(60)
            .and_then(|ttl| Utc::now().timestamp().checked_add(ttl))
            .ok_or_else(|| {
                AuthError::InternalError(format!("token lifetime of {ttl_minutes} minutes is out of range"))
            })?;

        let claims = TokenClaims {
            exp,
            token_type,
            extra,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InternalError(e.to_string()))
    }

    /// Issue an access token with the configured access lifetime.
    pub fn issue_access(&self, claims: Map<String, Value>) -> Result<String, AuthError> {
        self.issue(claims, self.access_ttl_minutes, TokenType::Access)
    }

    /// Issue a refresh token with the configured refresh lifetime.
    pub fn issue_refresh(&self, claims: Map<String, Value>) -> Result<String, AuthError> {
        self.issue(claims, self.refresh_ttl_minutes, TokenType::Refresh)
    }

    /// Verify signature, format and expiry.
    pub fn verify(&self, token: &str) -> Option<TokenClaims> {
        match decode::<TokenClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!(reason = ?e.kind(), "token rejected");
                None
            }
        }
    }

    /// Verify a token and require it to be of `expected` type.
    pub fn verify_as(&self, token: &str, expected: TokenType) -> Option<TokenClaims> {
        let claims = self.verify(token)?;
        if claims.token_type != expected {
            tracing::debug!(
                expected = %expected,
                actual = %claims.token_type,
                "token type mismatch"
            );
            return None;
        }
        Some(claims)
    }

    /// Mint a new access token from a refresh token.
    ///
    /// The access token carries the same principal identifier as the refresh
    /// token and nothing else.
    pub fn exchange_refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let claims = self
            .verify_as(refresh_token, TokenType::Refresh)
            .ok_or(AuthError::InvalidRefreshToken)?;

        // The original claim value is carried over so numeric ids stay numeric.
        let principal = match claims.extra.get(PRINCIPAL_ID_CLAIM) {
            Some(Value::String(id)) if !id.is_empty() => Value::String(id.clone()),
            Some(Value::Number(id)) => Value::Number(id.clone()),
            _ => return Err(AuthError::InvalidRefreshToken),
        };

        let mut access_claims = Map::new();
        access_claims.insert(PRINCIPAL_ID_CLAIM.to_string(), principal);
        self.issue_access(access_claims)
    }
}
