//! Centralized configuration (environment variables + defaults).

/// Database connection string (required).
///
/// Missing `DATABASE_URL` is a fatal startup error.
pub fn database_url() -> String {
    std::env::var("DATABASE_URL").expect("DATABASE_URL must be set")
}

/// Postgres schema that holds the storefront collections (optional).
pub fn database_schema() -> String {
    std::env::var("DATABASE_SCHEMA").unwrap_or_else(|_| "public".to_string())
}

/// Listen address for the API server (optional).
pub fn bind_addr() -> String {
    std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string())
}
