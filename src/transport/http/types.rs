use crate::app::store::DocumentStore;
use crate::domain::resource::ResourceRegistry;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
    pub registry: Arc<ResourceRegistry>,
}

/// The uniform response envelope returned by every endpoint.
#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: JsonValue) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Bare `{"success": true}`, the delete/ack shape.
    pub fn ok_empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Body of a wishlist set-add: `POST /api/wishlist`.
#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WishlistAddRequest {
    pub user_id: String,
    pub product_id: String,
}

/// Bulk seed payload accepted by `/api/migrate` and `/api/init-data`.
///
/// Absent sections are skipped; a present-but-empty section is still
/// processed (which lets `/api/init-data` clear a collection).
#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SeedPayload {
    #[schema(value_type = Option<Vec<Object>>)]
    pub users: Option<Vec<JsonValue>>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub products: Option<Vec<JsonValue>>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub orders: Option<Vec<JsonValue>>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub carousel: Option<Vec<JsonValue>>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub vouchers: Option<Vec<JsonValue>>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub promo_cards: Option<Vec<JsonValue>>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub payment_verifications: Option<Vec<JsonValue>>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub refunds: Option<Vec<JsonValue>>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub notifications: Option<Vec<JsonValue>>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub reviews: Option<Vec<JsonValue>>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub conversations: Option<Vec<JsonValue>>,
    #[schema(value_type = Option<Object>)]
    pub delivery_settings: Option<JsonValue>,
}

impl SeedPayload {
    /// The array sections present in the payload, paired with the collection
    /// each one seeds. `deliverySettings` is a singleton and handled apart.
    pub fn sections(&self) -> Vec<(&'static str, &Vec<JsonValue>)> {
        let pairs: [(&'static str, &Option<Vec<JsonValue>>); 11] = [
            ("users", &self.users),
            ("products", &self.products),
            ("orders", &self.orders),
            ("carousel_slides", &self.carousel),
            ("vouchers", &self.vouchers),
            ("promo_cards", &self.promo_cards),
            ("payment_verifications", &self.payment_verifications),
            ("refund_requests", &self.refunds),
            ("notifications", &self.notifications),
            ("reviews", &self.reviews),
            ("conversations", &self.conversations),
        ];
        pairs
            .into_iter()
            .filter_map(|(collection, docs)| docs.as_ref().map(|d| (collection, d)))
            .collect()
    }
}
