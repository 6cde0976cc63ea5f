// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! [`AppConfig`] struct built from them. Configuration is loaded once from the
//! environment at startup and shared read-only for the life of the process.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `TOKEN_SECRET` | Symmetric secret used to sign and verify tokens | Required |
//! | `PAGE_SIZE` | Default number of results per page | `20` |
//! | `AUTH_SCHEME_LENGTH` | Characters stripped from the `Authorization` header before the token | `4` |
//! | `ACCESS_TOKEN_TTL_MINUTES` | Lifetime of access tokens | `1440` (24h) |
//! | `REFRESH_TOKEN_TTL_MINUTES` | Lifetime of refresh tokens | `10080` (7 days) |
//! | `SEED_PRINCIPAL_ID` | Principal registered in the in-memory store at startup | Unset |
//! | `SEED_PRINCIPAL_EMAIL` | Login email for the seeded principal | Unset |
//! | `SEED_PRINCIPAL_PASSWORD` | Login password for the seeded principal | Unset |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::fmt;
use std::str::FromStr;

/// Environment variable holding the token signing secret.
pub const TOKEN_SECRET_ENV: &str = "TOKEN_SECRET";

/// Environment variable overriding the default page size.
pub const PAGE_SIZE_ENV: &str = "PAGE_SIZE";

/// Environment variable overriding the bearer scheme length.
pub const AUTH_SCHEME_LENGTH_ENV: &str = "AUTH_SCHEME_LENGTH";

pub const ACCESS_TOKEN_TTL_ENV: &str = "ACCESS_TOKEN_TTL_MINUTES";
pub const REFRESH_TOKEN_TTL_ENV: &str = "REFRESH_TOKEN_TTL_MINUTES";
pub const SEED_PRINCIPAL_ENV: &str = "SEED_PRINCIPAL_ID";
pub const SEED_EMAIL_ENV: &str = "SEED_PRINCIPAL_EMAIL";
pub const SEED_PASSWORD_ENV: &str = "SEED_PRINCIPAL_PASSWORD";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default results per page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Length of the `<scheme><separator>` prefix of the `Authorization` header.
///
/// The documented header form is `JWT <token>`: a three character scheme and
/// one separator. The prefix is cut by length, not by searching for a space.
pub const DEFAULT_AUTH_SCHEME_LENGTH: usize = 4;

/// Access tokens live for 24 hours.
pub const DEFAULT_ACCESS_TTL_MINUTES: i64 = 24 * 60;

/// Refresh tokens live for 7 days.
pub const DEFAULT_REFRESH_TTL_MINUTES: i64 = 7 * 24 * 60;

/// Upper bound for either token lifetime (100 years).
pub const MAX_TOKEN_TTL_MINUTES: i64 = 100 * 365 * 24 * 60;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Token signing secret.
///
/// Wrapped so it never ends up in logs through `Debug`.
#[derive(Clone)]
pub struct TokenSecret(String);

impl TokenSecret {
    /// Wrap a secret. Empty secrets are rejected.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::Missing(TOKEN_SECRET_ENV));
        }
        Ok(Self(secret))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenSecret([REDACTED])")
    }
}

/// Login for the seeded principal.
#[derive(Clone)]
pub struct SeedCredentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for SeedCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Process-wide configuration, constructed once in `main`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub token_secret: TokenSecret,
    pub page_size: usize,
    pub auth_scheme_length: usize,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
    pub seed_principal_id: Option<String>,
    pub seed_credentials: Option<SeedCredentials>,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    /// Configuration with defaults for everything but the secret.
    pub fn new(token_secret: TokenSecret) -> Self {
        Self {
            token_secret,
            page_size: DEFAULT_PAGE_SIZE,
            auth_scheme_length: DEFAULT_AUTH_SCHEME_LENGTH,
            access_ttl_minutes: DEFAULT_ACCESS_TTL_MINUTES,
            refresh_ttl_minutes: DEFAULT_REFRESH_TTL_MINUTES,
            seed_principal_id: None,
            seed_credentials: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Split out from [`AppConfig::from_env`] so tests don't touch the real
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(TOKEN_SECRET_ENV).ok_or(ConfigError::Missing(TOKEN_SECRET_ENV))?;
        let mut config = Self::new(TokenSecret::new(secret)?);

        if let Some(size) = parse_var::<usize>(&lookup, PAGE_SIZE_ENV)? {
            if size == 0 {
                return Err(ConfigError::Invalid {
                    name: PAGE_SIZE_ENV,
                    value: size.to_string(),
                });
            }
            config.page_size = size;
        }
        if let Some(len) = parse_var(&lookup, AUTH_SCHEME_LENGTH_ENV)? {
            config.auth_scheme_length = len;
        }
        if let Some(ttl) = parse_ttl(&lookup, ACCESS_TOKEN_TTL_ENV)? {
            config.access_ttl_minutes = ttl;
        }
        if let Some(ttl) = parse_ttl(&lookup, REFRESH_TOKEN_TTL_ENV)? {
            config.refresh_ttl_minutes = ttl;
        }
        if let Some(port) = parse_var(&lookup, PORT_ENV)? {
            config.port = port;
        }
        if let Some(host) = lookup(HOST_ENV).filter(|h| !h.is_empty()) {
            config.host = host;
        }
        config.seed_principal_id = lookup(SEED_PRINCIPAL_ENV).filter(|id| !id.is_empty());

        let email = lookup(SEED_EMAIL_ENV).filter(|e| !e.is_empty());
        let password = lookup(SEED_PASSWORD_ENV).filter(|p| !p.is_empty());
        config.seed_credentials = match (email, password) {
            (Some(email), Some(password)) => {
                if config.seed_principal_id.is_none() {
                    return Err(ConfigError::Missing(SEED_PRINCIPAL_ENV));
                }
                Some(SeedCredentials { email, password })
            }
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(SEED_PASSWORD_ENV)),
            (None, Some(_)) => return Err(ConfigError::Missing(SEED_EMAIL_ENV)),
        };

        Ok(config)
    }

    /// `host:port` string for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}

/// Token lifetimes must be positive and no longer than [`MAX_TOKEN_TTL_MINUTES`].
fn parse_ttl(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<i64>, ConfigError> {
    match parse_var::<i64>(lookup, name)? {
        Some(ttl) if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&ttl) => Err(ConfigError::Invalid {
            name,
            value: ttl.to_string(),
        }),
        ttl => Ok(ttl),
    }
}
