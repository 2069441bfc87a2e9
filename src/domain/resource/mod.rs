//! Domain descriptors for storefront resources.

use serde_json::{Map, Value as JsonValue};

pub mod catalog;
pub mod registry;

pub use registry::ResourceRegistry;

/// Order applied to list responses for a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Internal storage sequence (insertion order).
    Insertion,
    /// Ascending by a numeric document field (e.g. promo card `order`).
    Ascending(&'static str),
    /// Descending by a string document field (e.g. `createdAt`).
    Descending(&'static str),
}

/// Composable list predicate. Rendered to SQL by the document store.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Exact match on a top-level string field.
    Eq(String, String),
    /// Field equals any of the given values.
    In(String, Vec<String>),
    /// Field is absent or JSON null.
    Missing(String),
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Eq(field.into(), value.into())
    }
}

/// Trait that defines the gateway contract for one resource type.
///
/// The generic CRUD handlers work against any resource without knowing its
/// schema; each implementation provides the collection name, the query
/// parameters it can be filtered by, its list ordering, and the defaults
/// injected into new documents. Resource-specific quirks (the notification
/// broadcast filter, id prefixes) are expressed as overrides here.
pub trait Resource: Send + Sync {
    /// Route segment under `/api/` (e.g. `promo-cards`).
    fn name(&self) -> &str;

    /// Name of the backing collection (e.g. `promo_cards`).
    fn collection(&self) -> &str;

    /// Query parameters accepted as list filters, in match priority order.
    fn filterable_fields(&self) -> &[&str] {
        &[]
    }

    /// Order applied to list responses.
    fn sort_order(&self) -> SortOrder {
        SortOrder::Insertion
    }

    /// Whether a missing `createdAt` is stamped on create.
    fn stamps_created_at(&self) -> bool {
        true
    }

    /// Optional prefix for generated ids.
    fn id_prefix(&self) -> Option<&str> {
        None
    }

    /// Injects resource defaults into a new document.
    ///
    /// Called after id/`createdAt` assignment; must only add fields the
    /// caller did not supply.
    fn apply_create_defaults(&self, _doc: &mut Map<String, JsonValue>) {}

    /// Builds the list predicate for one filter query parameter.
    ///
    /// Default is an exact match on the field.
    fn filter_for(&self, field: &str, value: &str) -> Filter {
        Filter::eq(field, value)
    }
}
