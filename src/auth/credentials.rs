// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Email/password credentials.
//!
//! Passwords are stored as Argon2id PHC strings. The login endpoint checks
//! them through a [`CredentialVerifier`] supplied by the persistence layer and
//! then issues an access/refresh pair for the matching principal.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};
use async_trait::async_trait;

use super::authenticator::LookupError;
use super::context::Principal;
use super::AuthError;

/// Source of credential checks, supplied by the persistence layer.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// The principal owning `email` if `password` matches its stored hash.
    ///
    /// Unknown emails and wrong passwords both yield `Ok(None)`.
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Principal>, LookupError>;
}

/// Hash a password with Argon2id and a random salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::InternalError(format!("failed to hash password: {e}")))
}

/// Check a password against a stored PHC hash.
///
/// A hash that cannot be parsed never matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash is malformed");
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
