// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Token-based authentication and request-scoped authorization.
//!
//! ## Auth Flow
//!
//! 1. A client logs in with email and password and obtains an
//!    access/refresh token pair signed with the process secret (HS256)
//! 2. The client sends `Authorization: JWT <access token>`
//! 3. The server, once per request:
//!    - strips the fixed-length scheme prefix
//!    - verifies signature, expiry and token type
//!    - resolves the `user_id` claim through the principal lookup
//!    - stores the result in the request's [`RequestContext`]
//! 4. Gated handlers reject requests whose context holds no principal
//!
//! ## Security
//!
//! - Malformed, tampered, expired and wrong-type tokens are indistinguishable
//!   to the caller: the request is simply anonymous
//! - Refresh tokens are only accepted by the refresh exchange
//! - There is no clock skew tolerance

pub mod authenticator;
pub mod context;
pub mod credentials;
pub mod error;
pub mod gate;
pub mod middleware;
pub mod token;

pub use authenticator::{LookupError, PrincipalLookup, RequestAuthenticator};
pub use context::{Principal, RequestContext};
pub use credentials::CredentialVerifier;
pub use error::AuthError;
pub use gate::{require_authenticated, Authenticated};
pub use middleware::authenticate_request;
pub use token::{TokenClaims, TokenCodec, TokenType};
