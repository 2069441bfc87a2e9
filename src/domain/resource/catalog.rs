//! The storefront resource catalog.
//!
//! One descriptor per resource served by the generic `/api/:resource`
//! handlers. The wishlist and delivery-settings collections are not listed
//! here: their request shapes differ from the uniform CRUD contract, so they
//! have dedicated handlers.

use super::{Filter, Resource, SortOrder};
use serde_json::{json, Map, Value as JsonValue};

/// Singleton delivery-settings collection; one document under a fixed id.
pub const SETTINGS_COLLECTION: &str = "delivery_settings";
/// Fixed id of the delivery-settings singleton.
pub const SETTINGS_ID: &str = "default";
/// Per-user wishlist collection, keyed by `userId` rather than `id`.
pub const WISHLISTS_COLLECTION: &str = "user_wishlists";

pub struct UsersResource;

impl Resource for UsersResource {
    fn name(&self) -> &str {
        "users"
    }

    fn collection(&self) -> &str {
        "users"
    }

    fn filterable_fields(&self) -> &[&str] {
        &["email"]
    }
}

pub struct ProductsResource;

impl Resource for ProductsResource {
    fn name(&self) -> &str {
        "products"
    }

    fn collection(&self) -> &str {
        "products"
    }

    fn filterable_fields(&self) -> &[&str] {
        &["category", "status"]
    }
}

pub struct OrdersResource;

impl Resource for OrdersResource {
    fn name(&self) -> &str {
        "orders"
    }

    fn collection(&self) -> &str {
        "orders"
    }

    fn filterable_fields(&self) -> &[&str] {
        &["userId", "status"]
    }

    fn sort_order(&self) -> SortOrder {
        SortOrder::Descending("createdAt")
    }
}

pub struct VouchersResource;

impl Resource for VouchersResource {
    fn name(&self) -> &str {
        "vouchers"
    }

    fn collection(&self) -> &str {
        "vouchers"
    }

    fn filterable_fields(&self) -> &[&str] {
        &["code"]
    }

    fn id_prefix(&self) -> Option<&str> {
        Some("voucher")
    }

    fn apply_create_defaults(&self, doc: &mut Map<String, JsonValue>) {
        doc.entry("usedCount").or_insert(json!(0));
    }
}

pub struct ReviewsResource;

impl Resource for ReviewsResource {
    fn name(&self) -> &str {
        "reviews"
    }

    fn collection(&self) -> &str {
        "reviews"
    }

    fn filterable_fields(&self) -> &[&str] {
        &["productId", "userId"]
    }

    fn sort_order(&self) -> SortOrder {
        SortOrder::Descending("createdAt")
    }
}

pub struct NotificationsResource;

impl Resource for NotificationsResource {
    fn name(&self) -> &str {
        "notifications"
    }

    fn collection(&self) -> &str {
        "notifications"
    }

    fn filterable_fields(&self) -> &[&str] {
        &["userId", "target"]
    }

    fn sort_order(&self) -> SortOrder {
        SortOrder::Descending("createdAt")
    }

    fn id_prefix(&self) -> Option<&str> {
        Some("notification")
    }

    fn apply_create_defaults(&self, doc: &mut Map<String, JsonValue>) {
        doc.entry("isRead").or_insert(json!(false));
    }

    /// A user's feed is their own notifications plus broadcasts: documents
    /// with no `userId` whose `target` is `user` or `all`.
    fn filter_for(&self, field: &str, value: &str) -> Filter {
        if field == "userId" {
            Filter::Or(vec![
                Filter::eq("userId", value),
                Filter::And(vec![
                    Filter::Missing("userId".to_string()),
                    Filter::In(
                        "target".to_string(),
                        vec!["user".to_string(), "all".to_string()],
                    ),
                ]),
            ])
        } else {
            Filter::eq(field, value)
        }
    }
}

pub struct PaymentsResource;

impl Resource for PaymentsResource {
    fn name(&self) -> &str {
        "payments"
    }

    fn collection(&self) -> &str {
        "payment_verifications"
    }

    fn filterable_fields(&self) -> &[&str] {
        &["userId", "orderId", "status"]
    }
}

pub struct RefundsResource;

impl Resource for RefundsResource {
    fn name(&self) -> &str {
        "refunds"
    }

    fn collection(&self) -> &str {
        "refund_requests"
    }

    fn filterable_fields(&self) -> &[&str] {
        &["userId", "orderId", "status"]
    }
}

pub struct ConversationsResource;

impl Resource for ConversationsResource {
    fn name(&self) -> &str {
        "conversations"
    }

    fn collection(&self) -> &str {
        "conversations"
    }

    fn filterable_fields(&self) -> &[&str] {
        &["userId"]
    }
}

pub struct CarouselResource;

impl Resource for CarouselResource {
    fn name(&self) -> &str {
        "carousel"
    }

    fn collection(&self) -> &str {
        "carousel_slides"
    }

    fn sort_order(&self) -> SortOrder {
        SortOrder::Ascending("order")
    }
}

pub struct PromoCardsResource;

impl Resource for PromoCardsResource {
    fn name(&self) -> &str {
        "promo-cards"
    }

    fn collection(&self) -> &str {
        "promo_cards"
    }

    fn sort_order(&self) -> SortOrder {
        SortOrder::Ascending("order")
    }
}
