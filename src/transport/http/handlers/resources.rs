//! The generic CRUD handlers behind `/api/:resource`.
//!
//! One handler set serves every catalog resource; per-resource behavior
//! (filters, ordering, create defaults, id prefixes) comes from the
//! `Resource` descriptor.

use crate::domain::id::{created_at_now, IdGenerator};
use crate::domain::resource::Resource;
use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;

fn lookup_resource(
    state: &AppState,
    name: &str,
) -> Result<Arc<dyn Resource>, (StatusCode, Json<ApiResponse>)> {
    state.registry.get(name).ok_or((
        StatusCode::NOT_FOUND,
        Json(ApiResponse::failure(format!(
            "Unknown resource '{}'",
            name
        ))),
    ))
}

fn internal_error(e: anyhow::Error) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::failure(e.to_string())),
    )
}

fn bad_request(message: &str) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::failure(message)),
    )
}

#[utoipa::path(
    get,
    path = "/api/{resource}",
    params(
        ("resource" = String, Path, description = "Resource route name (e.g. products)"),
        ("id" = Option<String>, Query, description = "Return the single document with this id"),
        ("userId" = Option<String>, Query, description = "Filter field (availability varies per resource)")
    ),
    responses(
        (status = 200, description = "Document list, or single document (null when absent)", body = ApiResponse),
        (status = 404, description = "Unknown resource", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn read_handler(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let resource = match lookup_resource(&state, &resource) {
        Ok(r) => r,
        Err(resp) => return resp.into_response(),
    };

    // Get-one wins over list filters when both are present.
    if let Some(id) = params.get("id") {
        return match state.store.get(resource.collection(), id).await {
            // Absence is not an error: the contract returns success with null data.
            Ok(doc) => (
                StatusCode::OK,
                Json(ApiResponse::ok(doc.unwrap_or(JsonValue::Null))),
            )
                .into_response(),
            Err(e) => internal_error(e).into_response(),
        };
    }

    let filter = resource
        .filterable_fields()
        .iter()
        .find_map(|field| {
            params
                .get(*field)
                .map(|value| resource.filter_for(field, value))
        });

    match state
        .store
        .list(resource.collection(), filter.as_ref(), resource.sort_order())
        .await
    {
        Ok(docs) => (
            StatusCode::OK,
            Json(ApiResponse::ok(JsonValue::Array(docs))),
        )
            .into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/{resource}",
    params(
        ("resource" = String, Path, description = "Resource route name (e.g. products)")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Created document, including generated fields", body = ApiResponse),
        (status = 400, description = "Bad request", body = ApiResponse),
        (status = 404, description = "Unknown resource", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn create_handler(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> impl IntoResponse {
    let resource = match lookup_resource(&state, &resource) {
        Ok(r) => r,
        Err(resp) => return resp.into_response(),
    };

    let Json(body) = match body {
        Ok(v) => v,
        Err(e) => {
            return bad_request(&format!("Invalid JSON body: {}", e)).into_response();
        }
    };
    let mut doc = match body {
        JsonValue::Object(map) => map,
        _ => return bad_request("Request body must be a JSON object").into_response(),
    };

    if !doc.contains_key("id") {
        let generator = match resource.id_prefix() {
            Some(prefix) => IdGenerator::with_prefix(prefix),
            None => IdGenerator::new(),
        };
        doc.insert("id".to_string(), JsonValue::String(generator.generate()));
    }
    if resource.stamps_created_at() && !doc.contains_key("createdAt") {
        doc.insert(
            "createdAt".to_string(),
            JsonValue::String(created_at_now()),
        );
    }
    resource.apply_create_defaults(&mut doc);

    match state
        .store
        .insert(resource.collection(), &JsonValue::Object(doc))
        .await
    {
        Ok(created) => (StatusCode::OK, Json(ApiResponse::ok(created))).into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/{resource}",
    params(
        ("resource" = String, Path, description = "Resource route name (e.g. products)")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Updated document (null when the id does not exist)", body = ApiResponse),
        (status = 400, description = "Missing 'id' in request body", body = ApiResponse),
        (status = 404, description = "Unknown resource", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn update_handler(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> impl IntoResponse {
    let resource = match lookup_resource(&state, &resource) {
        Ok(r) => r,
        Err(resp) => return resp.into_response(),
    };

    let Json(body) = match body {
        Ok(v) => v,
        Err(e) => {
            return bad_request(&format!("Invalid JSON body: {}", e)).into_response();
        }
    };
    if !body.is_object() {
        return bad_request("Request body must be a JSON object").into_response();
    }
    let Some(id) = crate::app::store::doc_id(&body) else {
        return bad_request("Missing 'id' in request body").into_response();
    };

    match state.store.update(resource.collection(), &id, &body).await {
        Ok(updated) => (
            StatusCode::OK,
            Json(ApiResponse::ok(updated.unwrap_or(JsonValue::Null))),
        )
            .into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/{resource}",
    params(
        ("resource" = String, Path, description = "Resource route name (e.g. products)"),
        ("id" = String, Query, description = "Id of the document to delete")
    ),
    responses(
        (status = 200, description = "Deleted (idempotent: absent ids succeed too)", body = ApiResponse),
        (status = 400, description = "Missing 'id' query parameter", body = ApiResponse),
        (status = 404, description = "Unknown resource", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let resource = match lookup_resource(&state, &resource) {
        Ok(r) => r,
        Err(resp) => return resp.into_response(),
    };

    let Some(id) = params.get("id") else {
        return bad_request("Missing 'id' query parameter").into_response();
    };

    match state.store.delete(resource.collection(), id).await {
        Ok(_) => (StatusCode::OK, Json(ApiResponse::ok_empty())).into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

/// Method fallback for every mounted route.
pub async fn method_not_allowed_handler() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ApiResponse::failure("Method not allowed")),
    )
}

/// Global fallback: unknown paths get the envelope too, never a bare 404.
pub async fn route_not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::failure("Route not found")),
    )
}
