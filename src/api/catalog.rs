// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Catalogue endpoints: searchable, paginated listing and gated creation.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::{require_authenticated, RequestContext},
    error::ApiError,
    models::{CatalogItem, CreateCatalogItemRequest},
    query::{Page, PageQuery, SearchQuery},
    state::AppState,
};

/// List catalogue items.
///
/// `search` is split into terms (double quotes group a phrase); an item is
/// returned when every term appears, ignoring case, in at least one of the
/// searched fields. Out-of-range pages are clamped.
#[utoipa::path(
    get,
    path = "/v1/catalog",
    params(SearchQuery, PageQuery),
    tag = "Catalog",
    responses(
        (status = 200, description = "One page of matching items", body = Page<CatalogItem>),
        (status = 400, description = "Unknown search field or zero page size")
    )
)]
pub async fn list_catalog(
    State(state): State<AppState>,
    Query(search): Query<SearchQuery>,
    Query(paging): Query<PageQuery>,
) -> Result<Json<Page<CatalogItem>>, ApiError> {
    let filter = search.compile(&state.catalog_search)?;
    let items = state.store.read().await.list_catalog(&filter);
    let page = state.paginator.paginate_query(&items, &paging)?;
    Ok(Json(page))
}

/// Create a catalogue item. Requires an authenticated principal.
///
/// The body is only parsed once the principal check has passed, so anonymous
/// callers always get 401 whatever they send.
#[utoipa::path(
    post,
    path = "/v1/catalog",
    request_body = CreateCatalogItemRequest,
    tag = "Catalog",
    responses(
        (status = 201, body = CatalogItem),
        (status = 401, description = "No authenticated principal"),
        (status = 422, description = "Malformed or invalid item")
    )
)]
pub async fn create_catalog_item(
    State(state): State<AppState>,
    context: RequestContext,
    body: Bytes,
) -> Result<(StatusCode, Json<CatalogItem>), ApiError> {
    require_authenticated(&context, |principal| async move {
        let request: CreateCatalogItemRequest = serde_json::from_slice(&body)
            .map_err(|e| ApiError::unprocessable(format!("invalid catalog item: {e}")))?;
        if request.name.trim().is_empty() {
            return Err(ApiError::unprocessable("name must not be empty"));
        }
        if request.price_cents < 0 {
            return Err(ApiError::unprocessable("price_cents must not be negative"));
        }

        let item = state
            .store
            .write()
            .await
            .create_catalog_item(request, &principal.id);
        tracing::info!(item_id = %item.id, principal_id = %principal.id, "catalog item created");
        Ok((StatusCode::CREATED, Json(item)))
    })
    .await
}
