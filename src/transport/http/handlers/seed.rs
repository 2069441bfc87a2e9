//! Bulk seed endpoints: `/api/migrate` and `/api/init-data`.
//!
//! Migrate upserts by id (running it twice with the same payload leaves the
//! collections unchanged); init-data clears each present section first and
//! then inserts, i.e. a bulk replace.

use crate::app::store::{doc_id, DocumentStore};
use crate::domain::id::IdGenerator;
use crate::domain::resource::catalog::{SETTINGS_COLLECTION, SETTINGS_ID};
use crate::transport::http::types::{ApiResponse, AppState, SeedPayload};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Map, Value as JsonValue};

/// Prepares one seed record: must be an object; gets an id when missing.
fn prepare_record(collection: &str, record: &JsonValue) -> anyhow::Result<JsonValue> {
    let mut doc = record
        .as_object()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Seed record for '{}' must be a JSON object", collection))?;
    if doc_id(record).is_none() {
        doc.insert(
            "id".to_string(),
            JsonValue::String(IdGenerator::new().generate()),
        );
    }
    Ok(JsonValue::Object(doc))
}

async fn upsert_settings(store: &DocumentStore, settings: &JsonValue) -> anyhow::Result<()> {
    let mut doc = settings
        .as_object()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("deliverySettings must be a JSON object"))?;
    doc.insert("id".to_string(), JsonValue::String(SETTINGS_ID.to_string()));
    store
        .upsert(SETTINGS_COLLECTION, &JsonValue::Object(doc))
        .await?;
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/migrate",
    request_body = SeedPayload,
    responses(
        (status = 200, description = "Seed data upserted by id (idempotent)", body = ApiResponse),
        (status = 400, description = "Bad request", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn migrate_handler(
    State(state): State<AppState>,
    payload: Result<Json<SeedPayload>, JsonRejection>,
) -> impl IntoResponse {
    let Json(payload) = match payload {
        Ok(v) => v,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::failure(format!("Invalid JSON body: {}", e))),
            )
                .into_response();
        }
    };

    let result = async {
        let mut counts = Map::new();
        for (collection, records) in payload.sections() {
            for record in records {
                let doc = prepare_record(collection, record)?;
                state.store.upsert(collection, &doc).await?;
            }
            counts.insert(collection.to_string(), json!(records.len()));
        }
        if let Some(settings) = &payload.delivery_settings {
            upsert_settings(&state.store, settings).await?;
            counts.insert(SETTINGS_COLLECTION.to_string(), json!(1));
        }
        anyhow::Ok(counts)
    }
    .await;

    match result {
        Ok(counts) => {
            println!("> Migration upserted {} collection(s).", counts.len());
            (
                StatusCode::OK,
                Json(ApiResponse::ok(json!({ "upserted": counts }))),
            )
                .into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::failure(e.to_string())),
        )
            .into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/init-data",
    request_body = SeedPayload,
    responses(
        (status = 200, description = "Collections replaced with the seed data", body = ApiResponse),
        (status = 400, description = "Bad request", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn init_data_handler(
    State(state): State<AppState>,
    payload: Result<Json<SeedPayload>, JsonRejection>,
) -> impl IntoResponse {
    let Json(payload) = match payload {
        Ok(v) => v,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::failure(format!("Invalid JSON body: {}", e))),
            )
                .into_response();
        }
    };

    let result = async {
        let mut counts = Map::new();
        for (collection, records) in payload.sections() {
            state.store.clear(collection).await?;
            for record in records {
                let doc = prepare_record(collection, record)?;
                state.store.insert(collection, &doc).await?;
            }
            counts.insert(collection.to_string(), json!(records.len()));
        }
        if let Some(settings) = &payload.delivery_settings {
            upsert_settings(&state.store, settings).await?;
            counts.insert(SETTINGS_COLLECTION.to_string(), json!(1));
        }
        anyhow::Ok(counts)
    }
    .await;

    match result {
        Ok(counts) => {
            println!("> Init-data replaced {} collection(s).", counts.len());
            (
                StatusCode::OK,
                Json(ApiResponse::ok(json!({ "replaced": counts }))),
            )
                .into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::failure(e.to_string())),
        )
            .into_response(),
    }
}
