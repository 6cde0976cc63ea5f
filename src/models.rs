// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::Principal;

/// Fields of [`CatalogItem`] that free-text search may target.
pub const CATALOG_SEARCH_FIELDS: [&str; 3] = ["name", "category", "description"];

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Price in the smallest currency unit
    pub price_cents: i64,
    /// Principal that created the item
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl CatalogItem {
    /// Value of a searchable field by name.
    pub fn search_field(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(&self.name),
            "category" => Some(&self.category),
            "description" => Some(&self.description),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCatalogItemRequest {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Tokens issued on login, with the principal they belong to.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub user: Principal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RefreshRequest {
    /// A refresh token
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccessTokenResponse {
    /// A fresh access token
    pub access: String,
}

/// Access and refresh tokens issued together.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}
