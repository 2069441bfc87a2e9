//! Per-user wishlist handlers.
//!
//! Wishlists are keyed by `userId` rather than `id`, and the `products`
//! field has set semantics: adding a product twice stores it once.

use crate::app::store::DocumentStore;
use crate::domain::id::IdGenerator;
use crate::domain::resource::catalog::WISHLISTS_COLLECTION;
use crate::domain::resource::Filter;
use crate::transport::http::types::{ApiResponse, AppState, WishlistAddRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value as JsonValue};
use std::collections::HashMap;

/// Fetches the user's wishlist, lazily creating an empty one.
async fn fetch_or_create(store: &DocumentStore, user_id: &str) -> anyhow::Result<JsonValue> {
    if let Some(doc) = store
        .find_one(WISHLISTS_COLLECTION, &Filter::eq("userId", user_id))
        .await?
    {
        return Ok(doc);
    }
    let doc = json!({
        "id": IdGenerator::new().generate(),
        "userId": user_id,
        "products": [],
    });
    store.insert(WISHLISTS_COLLECTION, &doc).await
}

#[utoipa::path(
    get,
    path = "/api/wishlist",
    params(
        ("userId" = String, Query, description = "Owner of the wishlist")
    ),
    responses(
        (status = 200, description = "The user's wishlist (created empty when absent)", body = ApiResponse),
        (status = 400, description = "Missing 'userId' query parameter", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn get_wishlist_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let Some(user_id) = params.get("userId") else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::failure("Missing 'userId' query parameter")),
        )
            .into_response();
    };

    match fetch_or_create(&state.store, user_id).await {
        Ok(doc) => (StatusCode::OK, Json(ApiResponse::ok(doc))).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::failure(e.to_string())),
        )
            .into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/wishlist",
    request_body = WishlistAddRequest,
    responses(
        (status = 200, description = "Updated wishlist (set-add: duplicates stored once)", body = ApiResponse),
        (status = 400, description = "Missing 'userId' or 'productId'", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn add_product_handler(
    State(state): State<AppState>,
    request: Result<Json<WishlistAddRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::failure(format!(
                    "Invalid JSON body: {} (expected: {{\"userId\": ..., \"productId\": ...}})",
                    e
                ))),
            )
                .into_response();
        }
    };

    let result = async {
        let mut doc = fetch_or_create(&state.store, &request.user_id).await?;
        let products = doc
            .get_mut("products")
            .and_then(JsonValue::as_array_mut)
            .ok_or_else(|| anyhow::anyhow!("Wishlist document has no 'products' array"))?;

        let entry = JsonValue::String(request.product_id.clone());
        if !products.contains(&entry) {
            products.push(entry);
        }
        state.store.upsert(WISHLISTS_COLLECTION, &doc).await
    }
    .await;

    match result {
        Ok(doc) => (StatusCode::OK, Json(ApiResponse::ok(doc))).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::failure(e.to_string())),
        )
            .into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/wishlist",
    params(
        ("userId" = String, Query, description = "Owner of the wishlist"),
        ("productId" = String, Query, description = "Product to remove")
    ),
    responses(
        (status = 200, description = "Removed (idempotent: absent products succeed too)", body = ApiResponse),
        (status = 400, description = "Missing 'userId' or 'productId'", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn remove_product_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let (Some(user_id), Some(product_id)) = (params.get("userId"), params.get("productId")) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::failure(
                "Missing 'userId' or 'productId' query parameter",
            )),
        )
            .into_response();
    };

    let result = async {
        let Some(mut doc) = state
            .store
            .find_one(WISHLISTS_COLLECTION, &Filter::eq("userId", user_id))
            .await?
        else {
            // No wishlist yet: removal is a no-op.
            return Ok(None);
        };
        if let Some(products) = doc.get_mut("products").and_then(JsonValue::as_array_mut) {
            products.retain(|p| p.as_str() != Some(product_id.as_str()));
        }
        state
            .store
            .upsert(WISHLISTS_COLLECTION, &doc)
            .await
            .map(Some)
    }
    .await;

    match result {
        Ok(Some(doc)) => (StatusCode::OK, Json(ApiResponse::ok(doc))).into_response(),
        Ok(None) => (StatusCode::OK, Json(ApiResponse::ok_empty())).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::failure(e.to_string())),
        )
            .into_response(),
    }
}
