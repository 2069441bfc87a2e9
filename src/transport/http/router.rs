use crate::transport::http::handlers::{health, resources, seed, settings, wishlist};
use crate::transport::http::types::{ApiResponse, SeedPayload, WishlistAddRequest};
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::ping_handler,
        health::test_connection_handler,
        resources::read_handler,
        resources::create_handler,
        resources::update_handler,
        resources::delete_handler,
        wishlist::get_wishlist_handler,
        wishlist::add_product_handler,
        wishlist::remove_product_handler,
        settings::get_settings_handler,
        settings::update_settings_handler,
        seed::migrate_handler,
        seed::init_data_handler
    ),
    components(schemas(ApiResponse, WishlistAddRequest, SeedPayload))
)]
#[allow(dead_code)]
pub struct ApiDoc;

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    // Static routes win over the `:resource` capture, so the wishlist and
    // settings quirks never reach the generic handlers.
    Router::new()
        .route("/api/ping", get(health::ping_handler))
        .route("/api/test-connection", get(health::test_connection_handler))
        .route("/api/migrate", post(seed::migrate_handler))
        .route("/api/init-data", post(seed::init_data_handler))
        .route(
            "/api/wishlist",
            get(wishlist::get_wishlist_handler)
                .post(wishlist::add_product_handler)
                .delete(wishlist::remove_product_handler)
                .fallback(resources::method_not_allowed_handler),
        )
        .route(
            "/api/delivery-settings",
            get(settings::get_settings_handler)
                .put(settings::update_settings_handler)
                .fallback(resources::method_not_allowed_handler),
        )
        .route(
            "/api/:resource",
            get(resources::read_handler)
                .post(resources::create_handler)
                .put(resources::update_handler)
                .delete(resources::delete_handler)
                .fallback(resources::method_not_allowed_handler),
        )
        .fallback(resources::route_not_found_handler)
        .with_state(app_state)
}
