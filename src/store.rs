// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory store.
//!
//! Stands in for the persistence layer: it resolves principals for the
//! authenticator, checks login credentials and evaluates compiled search
//! filters over the catalogue.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::credentials::{hash_password, verify_password};
use crate::auth::{AuthError, CredentialVerifier, LookupError, Principal, PrincipalLookup};
use crate::models::{CatalogItem, CreateCatalogItemRequest};
use crate::query::CompiledFilter;

#[derive(Default)]
pub struct InMemoryStore {
    principals: HashMap<String, Principal>,
    /// Keyed by normalized email.
    credentials: HashMap<String, StoredCredential>,
    catalog: Vec<CatalogItem>,
}

struct StoredCredential {
    principal_id: String,
    password_hash: String,
}

/// Emails compare case-insensitively and ignore surrounding whitespace.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_principal(&mut self, principal: Principal) {
        self.principals.insert(principal.id.clone(), principal);
    }

    pub fn principal_by_id(&self, id: &str) -> Option<Principal> {
        self.principals.get(id).cloned()
    }

    /// Attach an email/password login to an existing principal.
    ///
    /// Replaces any login previously registered under the same email.
    pub fn register_credentials(
        &mut self,
        principal_id: &str,
        email: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        if !self.principals.contains_key(principal_id) {
            return Err(AuthError::InternalError(format!(
                "cannot register credentials for unknown principal {principal_id}"
            )));
        }
        let password_hash = hash_password(password)?;
        self.credentials.insert(
            normalize_email(email),
            StoredCredential {
                principal_id: principal_id.to_string(),
                password_hash,
            },
        );
        Ok(())
    }

    pub fn principal_count(&self) -> usize {
        self.principals.len()
    }

    pub fn catalog_len(&self) -> usize {
        self.catalog.len()
    }

    /// Catalogue items matching `filter`, in insertion order.
    pub fn list_catalog(&self, filter: &CompiledFilter) -> Vec<CatalogItem> {
        self.catalog
            .iter()
            .filter(|item| matches_filter(filter, item))
            .cloned()
            .collect()
    }

    pub fn create_catalog_item(
        &mut self,
        request: CreateCatalogItemRequest,
        created_by: &str,
    ) -> CatalogItem {
        let item = CatalogItem {
            id: Uuid::new_v4().to_string(),
            name: request.name,
            category: request.category,
            description: request.description,
            price_cents: request.price_cents,
            created_by: created_by.to_string(),
            created_at: Utc::now(),
        };
        self.catalog.push(item.clone());
        item
    }
}

/// Evaluate a compiled filter against one item.
///
/// Every clause must have at least one predicate whose field contains the
/// value, ignoring case. Unknown fields never match.
fn matches_filter(filter: &CompiledFilter, item: &CatalogItem) -> bool {
    filter.clauses.iter().all(|clause| {
        clause.predicates.iter().any(|predicate| {
            item.search_field(&predicate.field)
                .map(|value| contains_ignore_case(value, &predicate.value))
                .unwrap_or(false)
        })
    })
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl PrincipalLookup for RwLock<InMemoryStore> {
    async fn find_principal_by_id(&self, id: &str) -> Result<Option<Principal>, LookupError> {
        Ok(self.read().await.principal_by_id(id))
    }
}

#[async_trait]
impl CredentialVerifier for RwLock<InMemoryStore> {
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Principal>, LookupError> {
        let store = self.read().await;
        let Some(credential) = store.credentials.get(&normalize_email(email)) else {
            return Ok(None);
        };
        if !verify_password(password, &credential.password_hash) {
            return Ok(None);
        }
        Ok(store.principal_by_id(&credential.principal_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CATALOG_SEARCH_FIELDS;
    use crate::query::SearchCompiler;

    fn request(name: &str, category: &str, description: &str) -> CreateCatalogItemRequest {
        CreateCatalogItemRequest {
            name: name.to_string(),
            category: category.to_string(),
            description: description.to_string(),
            price_cents: 1999,
        }
    }

    fn seeded() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        store.create_catalog_item(request("Red Shoes", "Footwear", "Small running shoe"), "u1");
        store.create_catalog_item(request("Blue Shoes", "Footwear", "Large"), "u1");
        store.create_catalog_item(request("Red Hat", "Headwear", "small"), "u1");
        store
    }

    fn names(items: &[CatalogItem]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn unrestricted_filter_lists_everything_in_order() {
        let store = seeded();
        let items = store.list_catalog(&CompiledFilter::unrestricted());
        assert_eq!(names(&items), vec!["Red Shoes", "Blue Shoes", "Red Hat"]);
    }

    #[test]
    fn terms_are_conjoined_across_fields() {
        let store = seeded();
        let compiler = SearchCompiler::new(CATALOG_SEARCH_FIELDS);

        let filter = compiler.compile_all(r#""red shoes" small"#).unwrap();
        assert_eq!(names(&store.list_catalog(&filter)), vec!["Red Shoes"]);

        let filter = compiler.compile_all("RED").unwrap();
        assert_eq!(names(&store.list_catalog(&filter)), vec!["Red Shoes", "Red Hat"]);

        let filter = compiler.compile("footwear", &["name"]).unwrap();
        assert!(store.list_catalog(&filter).is_empty());
    }

    #[tokio::test]
    async fn credentials_resolve_to_their_principal() {
        let mut store = InMemoryStore::new();
        store.insert_principal(Principal::new("user_123"));
        store
            .register_credentials("user_123", "Alice@Example.com", "hunter22")
            .unwrap();
        let store = RwLock::new(store);

        assert_eq!(
            store.verify_credentials(" alice@example.com ", "hunter22").await.unwrap(),
            Some(Principal::new("user_123"))
        );
        assert_eq!(
            store.verify_credentials("alice@example.com", "hunter2").await.unwrap(),
            None
        );
        assert_eq!(
            store.verify_credentials("bob@example.com", "hunter22").await.unwrap(),
            None
        );
    }

    #[test]
    fn credentials_require_a_known_principal() {
        let mut store = InMemoryStore::new();
        assert!(matches!(
            store.register_credentials("ghost", "ghost@example.com", "pw"),
            Err(AuthError::InternalError(_))
        ));
    }

    #[tokio::test]
    async fn lookup_resolves_known_principals_only() {
        let mut store = InMemoryStore::new();
        store.insert_principal(Principal::new("user_123"));
        let store = RwLock::new(store);

        assert_eq!(
            store.find_principal_by_id("user_123").await.unwrap(),
            Some(Principal::new("user_123"))
        );
        assert_eq!(store.find_principal_by_id("ghost").await.unwrap(), None);
    }
}
