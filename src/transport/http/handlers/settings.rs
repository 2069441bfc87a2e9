//! Delivery-settings singleton handlers.
//!
//! One document under the fixed id `default`. GET materializes it with
//! hardcoded defaults when absent; PUT always writes against the fixed key.

use crate::domain::resource::catalog::{SETTINGS_COLLECTION, SETTINGS_ID};
use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value as JsonValue};

fn default_settings() -> JsonValue {
    json!({
        "id": SETTINGS_ID,
        "deliveryFee": 10,
        "freeDeliveryThreshold": 100,
        "expressFee": 25,
        "estimatedDays": "3-5",
        "codAvailable": true,
    })
}

#[utoipa::path(
    get,
    path = "/api/delivery-settings",
    responses(
        (status = 200, description = "Current delivery settings (created with defaults when absent)", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn get_settings_handler(State(state): State<AppState>) -> impl IntoResponse {
    let result = async {
        match state.store.get(SETTINGS_COLLECTION, SETTINGS_ID).await? {
            Some(doc) => Ok(doc),
            None => {
                state
                    .store
                    .upsert(SETTINGS_COLLECTION, &default_settings())
                    .await
            }
        }
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
    put,
    path = "/api/delivery-settings",
    request_body = Object,
    responses(
        (status = 200, description = "Updated delivery settings", body = ApiResponse),
        (status = 400, description = "Bad request", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn update_settings_handler(
    State(state): State<AppState>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(v) => v,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::failure(format!("Invalid JSON body: {}", e))),
            )
                .into_response();
        }
    };
    let mut patch = match body {
        JsonValue::Object(map) => map,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::failure("Request body must be a JSON object")),
            )
                .into_response();
        }
    };
    // The singleton key is not caller-controlled.
    patch.insert("id".to_string(), JsonValue::String(SETTINGS_ID.to_string()));
    let patch = JsonValue::Object(patch);

    let result = async {
        match state
            .store
            .update(SETTINGS_COLLECTION, SETTINGS_ID, &patch)
            .await?
        {
            Some(doc) => Ok(doc),
            None => state.store.upsert(SETTINGS_COLLECTION, &patch).await,
        }
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
