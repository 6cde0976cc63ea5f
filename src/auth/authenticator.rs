// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Resolves the `Authorization` header of a request to a principal.
//!
//! ## Header Contract
//!
//! The header is `<scheme> <token>`. The scheme prefix is removed by length
//! (`AUTH_SCHEME_LENGTH`, default 4 for `JWT `), not by looking for the
//! separator:
//!
//! - `JWT <token>` with length 4 yields `<token>`
//! - `Bear <token>` with length 4 yields ` <token>`, which never verifies
//! - a header no longer than the scheme length yields nothing
//!
//! Every failure on the way (absent header, bad token, wrong token type,
//! unknown principal) results in an anonymous request. Only a failing lookup
//! backend is reported as an error.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, HeaderMap};

use super::context::Principal;
use super::token::{TokenCodec, TokenType};

/// Principal lookup failures.
///
/// "Not found" is not an error; lookups return `Ok(None)` for that.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("principal store unavailable: {0}")]
    Unavailable(String),
}

/// Source of principals, supplied by the persistence layer.
#[async_trait]
pub trait PrincipalLookup: Send + Sync {
    /// Find a principal by id. May block on I/O; no retries are attempted.
    async fn find_principal_by_id(&self, id: &str) -> Result<Option<Principal>, LookupError>;
}

/// The `Authorization` header as a string, if present and valid UTF-8.
pub fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION)?.to_str().ok()
}

/// Remove the first `scheme_length` characters of the header.
///
/// Returns `None` when nothing follows the scheme.
pub fn strip_scheme(header: &str, scheme_length: usize) -> Option<&str> {
    header
        .char_indices()
        .nth(scheme_length)
        .map(|(offset, _)| &header[offset..])
}

/// Turns raw headers into principals.
#[derive(Clone)]
pub struct RequestAuthenticator {
    codec: TokenCodec,
    lookup: Arc<dyn PrincipalLookup>,
    scheme_length: usize,
}

impl RequestAuthenticator {
    pub fn new(codec: TokenCodec, lookup: Arc<dyn PrincipalLookup>, scheme_length: usize) -> Self {
        Self {
            codec,
            lookup,
            scheme_length,
        }
    }

    pub fn scheme_length(&self) -> usize {
        self.scheme_length
    }

    /// Resolve the raw header value to a principal.
    pub async fn authenticate(
        &self,
        authorization: Option<&str>,
    ) -> Result<Option<Principal>, LookupError> {
        let Some(header) = authorization else {
            return Ok(None);
        };

        let Some(token) = strip_scheme(header, self.scheme_length) else {
            tracing::debug!(scheme_length = self.scheme_length, "authorization header too short");
            return Ok(None);
        };

        let Some(claims) = self.codec.verify_as(token, TokenType::Access) else {
            return Ok(None);
        };

        let Some(principal_id) = claims.principal_id() else {
            tracing::debug!("access token carries no principal id");
            return Ok(None);
        };

        let principal = self.lookup.find_principal_by_id(&principal_id).await?;
        if principal.is_none() {
            tracing::debug!(principal_id = %principal_id, "token principal not found");
        }
        Ok(principal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::principal_claims;
    use crate::config::TokenSecret;
    use std::collections::HashMap;

    struct StaticLookup(HashMap<String, Principal>);

    #[async_trait]
    impl PrincipalLookup for StaticLookup {
        async fn find_principal_by_id(&self, id: &str) -> Result<Option<Principal>, LookupError> {
            Ok(self.0.get(id).cloned())
        }
    }

    struct FailingLookup;

    #[async_trait]
    impl PrincipalLookup for FailingLookup {
        async fn find_principal_by_id(&self, _id: &str) -> Result<Option<Principal>, LookupError> {
            Err(LookupError::Unavailable("connection refused".to_string()))
        }
    }

    fn codec() -> TokenCodec {
        TokenCodec::new(&TokenSecret::new("test-secret").unwrap())
    }

    fn authenticator(scheme_length: usize) -> RequestAuthenticator {
        let mut principals = HashMap::new();
        principals.insert(
            "user_123".to_string(),
            Principal::new("user_123").with_display_name("Alice"),
        );
        RequestAuthenticator::new(codec(), Arc::new(StaticLookup(principals)), scheme_length)
    }

    fn access_token(principal_id: &str) -> String {
        codec().issue_access(principal_claims(principal_id)).unwrap()
    }

    #[test]
    fn strip_scheme_cuts_by_length() {
        assert_eq!(strip_scheme("JWT abc", 4), Some("abc"));
        assert_eq!(strip_scheme("Bear abc", 4), Some(" abc"));
        assert_eq!(strip_scheme("Bearer abc", 7), Some("abc"));
        assert_eq!(strip_scheme("JWT ", 4), None);
        assert_eq!(strip_scheme("JWT", 4), None);
        assert_eq!(strip_scheme("", 4), None);
        assert_eq!(strip_scheme("Jé€ abc", 4), Some("abc"));
    }

    #[tokio::test]
    async fn absent_header_is_anonymous() {
        let result = authenticator(4).authenticate(None).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn documented_scheme_resolves_principal() {
        let header = format!("JWT {}", access_token("user_123"));
        let principal = authenticator(4)
            .authenticate(Some(&header))
            .await
            .unwrap()
            .expect("valid token should authenticate");
        assert_eq!(principal.id, "user_123");
        assert_eq!(principal.display_name.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn five_char_scheme_under_four_char_strip_is_anonymous() {
        // "Bear " is five characters; the fixed strip leaves a leading space.
        let header = format!("Bear {}", access_token("user_123"));
        let result = authenticator(4).authenticate(Some(&header)).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn configured_scheme_length_is_honoured() {
        let header = format!("Bearer {}", access_token("user_123"));
        let principal = authenticator(7).authenticate(Some(&header)).await.unwrap();
        assert_eq!(principal.unwrap().id, "user_123");
    }

    #[tokio::test]
    async fn header_shorter_than_scheme_is_anonymous() {
        let auth = authenticator(4);
        assert!(auth.authenticate(Some("JWT")).await.unwrap().is_none());
        assert!(auth.authenticate(Some("")).await.unwrap().is_none());
        assert!(auth.authenticate(Some("JWT ")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn invalid_tokens_are_anonymous() {
        let auth = authenticator(4);
        let expired = codec()
            .issue(principal_claims("user_123"), -1, TokenType::Access)
            .unwrap();
        let refresh = codec().issue_refresh(principal_claims("user_123")).unwrap();
        let no_principal = codec().issue_access(serde_json::Map::new()).unwrap();

        for token in ["garbage".to_string(), expired, refresh, no_principal] {
            let header = format!("JWT {token}");
            assert!(auth.authenticate(Some(&header)).await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn unknown_principal_is_anonymous() {
        let header = format!("JWT {}", access_token("ghost"));
        let result = authenticator(4).authenticate(Some(&header)).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn lookup_failure_propagates() {
        let auth = RequestAuthenticator::new(codec(), Arc::new(FailingLookup), 4);
        let header = format!("JWT {}", access_token("user_123"));
        let result = auth.authenticate(Some(&header)).await;
        assert!(matches!(result, Err(LookupError::Unavailable(_))));
    }

    #[tokio::test]
    async fn lookup_is_not_consulted_for_bad_tokens() {
        let auth = RequestAuthenticator::new(codec(), Arc::new(FailingLookup), 4);
        assert!(auth.authenticate(Some("JWT nope")).await.unwrap().is_none());
    }
}
