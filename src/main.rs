use auraz_gateway::infra::config;
use auraz_gateway::transport;
use auraz_gateway::DocumentStore;
use auraz_gateway::ResourceRegistry;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // --- Resource Catalog ---
    println!("> Initializing resource registry...");
    let registry = Arc::new(ResourceRegistry::storefront());
    println!("> Registered resources: {}", registry.list().join(", "));

    // --- Document Store ---
    println!("> Connecting document store...");
    let store = Arc::new(DocumentStore::new(&registry.collections()).await?);
    println!(
        "> Document store ready ({} collections, schema '{}').",
        registry.collections().len(),
        store.schema()
    );

    let app_state = transport::http::AppState {
        store: store.clone(),
        registry,
    };

    // --- API Server ---
    println!("> Starting API server...");
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()),
        )
        .layer(cors);

    let addr = config::bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    println!("> API server listening on http://{}", addr);
    println!("> Swagger UI available at /swagger-ui");
    println!("> Press Ctrl+C to shut down");

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            println!("\n> Shutdown signal received (Ctrl+C)...");
            store.close().await;
            println!("> Document store connections closed. Goodbye.");
        }
    }

    Ok(())
}
