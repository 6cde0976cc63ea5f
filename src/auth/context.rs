// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Principal and per-request authentication context.

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{authenticator::authorization_header, AuthError};
use crate::state::AppState;

/// The identity a request acts as.
///
/// Resolved from a token's principal claim by the principal lookup. This
/// layer never persists it; it lives for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Principal {
    /// Opaque principal identifier (e.g. a user id)
    pub id: String,

    /// Human-readable name, if the lookup provides one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// Request-scoped authentication state.
///
/// Holds at most one principal. It is built once per request by the
/// authentication middleware and is read-only afterwards; there is no way to
/// swap the principal of an existing context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    principal: Option<Principal>,
}

impl RequestContext {
    /// Context for a request with no principal.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Context carrying whatever the authenticator resolved.
    pub fn from_principal(principal: Option<Principal>) -> Self {
        Self { principal }
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }

    /// The principal, or [`AuthError::Unauthorized`].
    pub fn require_principal(&self) -> Result<&Principal, AuthError> {
        self.principal.as_ref().ok_or(AuthError::Unauthorized)
    }
}

/// Reads the context attached by the middleware.
///
/// Routes mounted without the middleware still get a context: the
/// authenticator runs inline and the result is cached in the request
/// extensions so it happens at most once per request.
impl FromRequestParts<AppState> for RequestContext {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(context) = parts.extensions.get::<RequestContext>().cloned() {
            return Ok(context);
        }

        let header = authorization_header(&parts.headers);
        let principal = state.authenticator.authenticate(header).await?;
        let context = RequestContext::from_principal(principal);
        parts.extensions.insert(context.clone());
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::principal_claims;
    use crate::config::{AppConfig, TokenSecret};
    use crate::store::InMemoryStore;
    use axum::http::Request;

    fn test_state() -> AppState {
        let mut store = InMemoryStore::new();
        store.insert_principal(Principal::new("user_123"));
        AppState::new(AppConfig::new(TokenSecret::new("test-secret").unwrap()), store)
    }

    fn parts_with_header(value: Option<String>) -> Parts {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = value {
            builder = builder.header("Authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn anonymous_context_rejects_require_principal() {
        let context = RequestContext::anonymous();
        assert!(!context.is_authenticated());
        assert!(matches!(
            context.require_principal(),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn populated_context_exposes_principal() {
        let context = RequestContext::from_principal(Some(Principal::new("user_123")));
        assert!(context.is_authenticated());
        assert_eq!(context.require_principal().unwrap().id, "user_123");
    }

    #[tokio::test]
    async fn extractor_prefers_extensions() {
        let state = test_state();
        let mut parts = parts_with_header(None);
        parts
            .extensions
            .insert(RequestContext::from_principal(Some(Principal::new("from_middleware"))));

        let context = RequestContext::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(context.principal().unwrap().id, "from_middleware");
    }

    #[tokio::test]
    async fn extractor_authenticates_inline_without_middleware() {
        let state = test_state();
        let token = state.tokens.issue_access(principal_claims("user_123")).unwrap();
        let mut parts = parts_with_header(Some(format!("JWT {token}")));

        let context = RequestContext::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(context.principal().unwrap().id, "user_123");
        assert!(parts.extensions.get::<RequestContext>().is_some());
    }

    #[tokio::test]
    async fn extractor_yields_anonymous_context_without_header() {
        let state = test_state();
        let mut parts = parts_with_header(None);

        let context = RequestContext::from_request_parts(&mut parts, &state).await.unwrap();
        assert!(!context.is_authenticated());
    }
}
