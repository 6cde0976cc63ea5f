// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Runs the [`RequestAuthenticator`](super::RequestAuthenticator) once per
//! request and stores the resulting [`RequestContext`] in the request
//! extensions. Anonymous requests pass through; gating is up to the handlers.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/protected", get(protected_handler))
//!     .route_layer(axum::middleware::from_fn_with_state(
//!         state.clone(),
//!         authenticate_request,
//!     ));
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{authenticator::authorization_header, AuthError, RequestContext};
use crate::state::AppState;

/// Authentication middleware function.
pub async fn authenticate_request(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = authorization_header(request.headers()).map(str::to_owned);

    match state.authenticator.authenticate(header.as_deref()).await {
        Ok(principal) => {
            if let Some(principal) = &principal {
                tracing::debug!(principal_id = %principal.id, "request authenticated");
            }
            request
                .extensions_mut()
                .insert(RequestContext::from_principal(principal));
            next.run(request).await
        }
        Err(e) => {
            tracing::warn!(error = %e, "principal lookup failed");
            AuthError::from(e).into_response()
        }
    }
}
