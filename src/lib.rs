pub mod app;
pub mod domain;
pub mod infra;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::store::DocumentStore;
pub use domain::id::IdGenerator;
pub use domain::resource::{Filter, Resource, ResourceRegistry, SortOrder};
