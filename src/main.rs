// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::net::SocketAddr;

use storefront_identity::{
    api::router,
    auth::Principal,
    config::{AppConfig, LOG_FORMAT_ENV},
    state::AppState,
    store::InMemoryStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[tokio::main]
async fn main() {
    init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let mut store = InMemoryStore::new();
    if let Some(id) = &config.seed_principal_id {
        store.insert_principal(Principal::new(id.clone()));
        tracing::info!(principal_id = %id, "seeded principal");

        if let Some(seed) = &config.seed_credentials {
            if let Err(e) = store.register_credentials(id, &seed.email, &seed.password) {
                tracing::error!(error = %e, "failed to register seed credentials");
                std::process::exit(1);
            }
            tracing::info!(principal_id = %id, email = %seed.email, "seeded login");
        }
    }

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .expect("Failed to parse bind address");

    tracing::info!(
        page_size = config.page_size,
        auth_scheme_length = config.auth_scheme_length,
        "configuration loaded"
    );

    let app = router(AppState::new(config, store));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!(%addr, "Storefront identity server listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}

/// Install the global subscriber. `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
