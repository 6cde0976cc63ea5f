// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization gate.
//!
//! Two ways to require a principal:
//!
//! - [`require_authenticated`] wraps an operation; the operation only runs
//!   when the request context holds a principal.
//! - the [`Authenticated`] extractor rejects the request before the handler
//!   body runs.
//!
//! ```rust,ignore
//! async fn delete_cart(context: RequestContext, State(state): State<AppState>) -> Result<StatusCode, ApiError> {
//!     require_authenticated(&context, |principal| async move {
//!         state.store.write().await.clear_cart(&principal.id);
//!         Ok(StatusCode::NO_CONTENT)
//!     })
//!     .await
//! }
//! ```

use std::future::Future;

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, Principal, RequestContext};
use crate::state::AppState;

/// Run `operation` as the request's principal, or fail with
/// [`AuthError::Unauthorized`] without running it.
pub async fn require_authenticated<F, Fut, T, E>(
    context: &RequestContext,
    operation: F,
) -> Result<T, E>
where
    F: FnOnce(Principal) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: From<AuthError>,
{
    let principal = match context.require_principal() {
        Ok(principal) => principal.clone(),
        Err(e) => {
            tracing::debug!("rejected anonymous request to gated operation");
            return Err(e.into());
        }
    };
    operation(principal).await
}

/// Extractor for handlers that need a principal.
///
/// # Example
///
/// ```rust,ignore
/// async fn whoami(Authenticated(principal): Authenticated) -> Json<Principal> {
///     Json(principal)
/// }
/// ```
pub struct Authenticated(pub Principal);

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let context = RequestContext::from_request_parts(parts, state).await?;
        let principal = context.require_principal()?.clone();
        Ok(Authenticated(principal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, TokenSecret};
    use crate::store::InMemoryStore;
    use axum::http::Request;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn operation_runs_with_principal() {
        let context = RequestContext::from_principal(Some(Principal::new("user_123")));
        let result: Result<String, AuthError> =
            require_authenticated(&context, |principal| async move { Ok(principal.id) }).await;
        assert_eq!(result.unwrap(), "user_123");
    }

    #[tokio::test]
    async fn operation_side_effects_never_happen_when_anonymous() {
        let writes = AtomicUsize::new(0);
        let context = RequestContext::anonymous();

        let result: Result<(), AuthError> = require_authenticated(&context, |_| async {
            writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(AuthError::Unauthorized)));
        assert_eq!(writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn operation_errors_pass_through() {
        let context = RequestContext::from_principal(Some(Principal::new("user_123")));
        let result: Result<(), AuthError> = require_authenticated(&context, |_| async {
            Err(AuthError::InternalError("boom".to_string()))
        })
        .await;
        assert!(matches!(result, Err(AuthError::InternalError(_))));
    }

    #[tokio::test]
    async fn extractor_rejects_anonymous_requests() {
        let state = AppState::new(
            AppConfig::new(TokenSecret::new("test-secret").unwrap()),
            InMemoryStore::new(),
        );
        let mut parts = Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = Authenticated::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn extractor_accepts_authenticated_context() {
        let state = AppState::new(
            AppConfig::new(TokenSecret::new("test-secret").unwrap()),
            InMemoryStore::new(),
        );
        let mut parts = Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0;
        parts
            .extensions
            .insert(RequestContext::from_principal(Some(Principal::new("user_123"))));

        let Authenticated(principal) = Authenticated::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(principal.id, "user_123");
    }
}
