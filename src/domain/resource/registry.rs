//! ResourceRegistry for mapping route names to Resource implementations.

use super::catalog::{
    CarouselResource, ConversationsResource, NotificationsResource, OrdersResource,
    PaymentsResource, ProductsResource, PromoCardsResource, RefundsResource, ReviewsResource,
    UsersResource, VouchersResource, SETTINGS_COLLECTION, WISHLISTS_COLLECTION,
};
use super::Resource;
use std::collections::HashMap;
use std::sync::Arc;

/// A registry that maps route names to their Resource implementations.
pub struct ResourceRegistry {
    resources: HashMap<String, Arc<dyn Resource>>,
}

impl ResourceRegistry {
    /// Creates a new empty ResourceRegistry.
    pub fn new() -> Self {
        Self {
            resources: HashMap::new(),
        }
    }

    /// The full storefront catalog: every resource served by the generic
    /// `/api/:resource` handlers.
    pub fn storefront() -> Self {
        let mut reg = Self::new();
        reg.register(UsersResource);
        reg.register(ProductsResource);
        reg.register(OrdersResource);
        reg.register(VouchersResource);
        reg.register(ReviewsResource);
        reg.register(NotificationsResource);
        reg.register(PaymentsResource);
        reg.register(RefundsResource);
        reg.register(ConversationsResource);
        reg.register(CarouselResource);
        reg.register(PromoCardsResource);
        reg
    }

    /// Registers a resource under its own route name.
    pub fn register<R: Resource + 'static>(&mut self, resource: R) {
        self.resources
            .insert(resource.name().to_string(), Arc::new(resource));
    }

    /// Retrieves a resource by route name.
    /// Returns None if the resource is not registered.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Resource>> {
        self.resources.get(name).cloned()
    }

    /// Returns all registered route names, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.resources.keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns every collection the store must provision, sorted: the
    /// registered resources plus the wishlist and settings collections that
    /// live behind dedicated handlers.
    pub fn collections(&self) -> Vec<String> {
        let mut collections: Vec<String> = self
            .resources
            .values()
            .map(|r| r.collection().to_string())
            .collect();
        collections.push(SETTINGS_COLLECTION.to_string());
        collections.push(WISHLISTS_COLLECTION.to_string());
        collections.sort();
        collections
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
