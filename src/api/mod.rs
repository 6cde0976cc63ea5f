// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{authenticate_request, Principal},
    models::{
        AccessTokenResponse, CatalogItem, CreateCatalogItemRequest, LoginRequest, LoginResponse,
        RefreshRequest, TokenPair,
    },
    state::AppState,
};

pub mod catalog;
pub mod health;
pub mod tokens;
pub mod users;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/users/me", get(users::get_current_user))
        .route(
            "/catalog",
            get(catalog::list_catalog).post(catalog::create_catalog_item),
        )
        .route("/auth/login", post(tokens::login))
        .route("/auth/refresh", post(tokens::refresh_access));

    #[cfg(feature = "dev")]
    let v1_routes = v1_routes.route("/dev/tokens", post(tokens::dev_issue_tokens));

    let v1_routes = v1_routes.route_layer(from_fn_with_state(state.clone(), authenticate_request));

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .nest("/v1", v1_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        users::get_current_user,
        catalog::list_catalog,
        catalog::create_catalog_item,
        tokens::login,
        tokens::refresh_access
    ),
    components(
        schemas(
            CatalogItem,
            CreateCatalogItemRequest,
            LoginRequest,
            LoginResponse,
            RefreshRequest,
            AccessTokenResponse,
            TokenPair,
            Principal,
            users::UserMeResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness"),
        (name = "Users", description = "Current principal"),
        (name = "Catalog", description = "Searchable, paginated catalogue"),
        (name = "Auth", description = "Login and token exchange")
    )
)]
struct ApiDoc;
