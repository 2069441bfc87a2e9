//! Liveness and connectivity probes.

use crate::domain::id::created_at_now;
use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/ping",
    responses(
        (status = 200, description = "Service is up (does not touch the database)")
    )
)]
pub async fn ping_handler() -> impl IntoResponse {
    // Literal legacy shape: message/timestamp at the top level, not in `data`.
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "pong",
            "timestamp": created_at_now(),
        })),
    )
}

#[utoipa::path(
    get,
    path = "/api/test-connection",
    responses(
        (status = 200, description = "Collection names and per-collection document counts", body = ApiResponse),
        (status = 500, description = "Database unreachable", body = ApiResponse)
    )
)]
pub async fn test_connection_handler(State(state): State<AppState>) -> impl IntoResponse {
    let result = async {
        let mut collections = Vec::new();
        for name in state.registry.collections() {
            let count = state.store.count(&name).await?;
            collections.push(json!({ "name": name, "count": count }));
        }
        anyhow::Ok(collections)
    }
    .await;

    match result {
        Ok(collections) => (
            StatusCode::OK,
            Json(ApiResponse::ok(json!({
                "schema": state.store.schema(),
                "collections": collections,
            }))),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::failure(format!("DB check failed: {}", e))),
        )
            .into_response(),
    }
}
