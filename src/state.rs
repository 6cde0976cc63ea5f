// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::{CredentialVerifier, RequestAuthenticator, TokenCodec};
use crate::config::AppConfig;
use crate::models::CATALOG_SEARCH_FIELDS;
use crate::query::{Paginator, SearchCompiler};
use crate::store::InMemoryStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: TokenCodec,
    pub authenticator: RequestAuthenticator,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub paginator: Paginator,
    pub catalog_search: SearchCompiler,
    pub store: Arc<RwLock<InMemoryStore>>,
}

impl AppState {
    pub fn new(config: AppConfig, store: InMemoryStore) -> Self {
        let store = Arc::new(RwLock::new(store));
        let tokens = TokenCodec::from_config(&config);
        let authenticator =
            RequestAuthenticator::new(tokens.clone(), store.clone(), config.auth_scheme_length);

        Self {
            paginator: Paginator::new(config.page_size),
            catalog_search: SearchCompiler::new(CATALOG_SEARCH_FIELDS),
            config: Arc::new(config),
            tokens,
            authenticator,
            credentials: store.clone(),
            store,
        }
    }
}
