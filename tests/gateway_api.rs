//! End-to-end gateway test against a live PostgreSQL:
//! spawn the router on a local listener, drive it over HTTP, and check the
//! CRUD contract (envelope shape, generated ids, merge updates, idempotent
//! deletes, per-resource filter and ordering policies).
//!
//! Skips (passing) when DATABASE_URL is not set.

use auraz_gateway::{transport, DocumentStore, ResourceRegistry};
use serde_json::{json, Value};
use std::sync::Arc;

async fn spawn_server(schema: &str) -> Option<String> {
    dotenv::dotenv().ok();
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("skipping: DATABASE_URL not set");
        return None;
    }
    std::env::set_var("DATABASE_SCHEMA", schema);

    let registry = Arc::new(ResourceRegistry::storefront());
    let store = Arc::new(
        DocumentStore::new(&registry.collections())
            .await
            .expect("store should connect"),
    );
    // Start from a clean schema so list/count assertions are exact.
    for collection in registry.collections() {
        store.clear(&collection).await.expect("clear should work");
    }

    let state = transport::http::AppState {
        store,
        registry,
    };
    let router = transport::http::create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Some(format!("http://{}", addr))
}

fn is_base36(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_gateway_crud_contract() -> Result<(), Box<dyn std::error::Error>> {
    let Some(base_url) = spawn_server("auraz_test_gateway").await else {
        return Ok(());
    };
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    // --- Liveness ---
    let ping = client
        .get(format!("{}/api/ping", base_url))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert!(ping["success"].as_bool().unwrap_or(false));
    assert_eq!(ping["message"], "pong");
    assert!(ping["timestamp"].as_str().is_some());

    // --- Create defaults id + createdAt, then round trip ---
    let created = client
        .post(format!("{}/api/products", base_url))
        .json(&json!({"name": "Aura Lamp", "price": 49, "category": "decor"}))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert!(created["success"].as_bool().unwrap_or(false));
    let product = &created["data"];
    let id = product["id"].as_str().expect("generated id").to_string();
    let (millis, suffix) = id.split_once('-').expect("id shape");
    assert!(millis.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(suffix.len(), 9);
    assert!(is_base36(suffix));
    assert!(product["createdAt"].as_str().is_some());

    let fetched = client
        .get(format!("{}/api/products", base_url))
        .query(&[("id", id.as_str())])
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert!(fetched["success"].as_bool().unwrap_or(false));
    assert_eq!(fetched["data"], *product);

    // --- Partial update preserves untouched fields ---
    let user = client
        .post(format!("{}/api/users", base_url))
        .json(&json!({"id": "u1", "name": "A", "email": "a@x.com"}))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert!(user["success"].as_bool().unwrap_or(false));

    let updated = client
        .put(format!("{}/api/users", base_url))
        .json(&json!({"id": "u1", "name": "B"}))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert!(updated["success"].as_bool().unwrap_or(false));
    assert_eq!(updated["data"]["name"], "B");
    assert_eq!(updated["data"]["email"], "a@x.com");
    assert_eq!(updated["data"]["id"], "u1");

    // Updating an absent id succeeds with null data (same policy as get-one).
    let missing = client
        .put(format!("{}/api/users", base_url))
        .json(&json!({"id": "no-such-user", "name": "X"}))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert!(missing["success"].as_bool().unwrap_or(false));
    assert!(missing["data"].is_null());

    // --- Idempotent delete ---
    for _ in 0..2 {
        let gone = client
            .delete(format!("{}/api/products", base_url))
            .query(&[("id", "never-existed")])
            .send()
            .await?
            .json::<Value>()
            .await?;
        assert!(gone["success"].as_bool().unwrap_or(false));
    }
    let deleted = client
        .delete(format!("{}/api/products", base_url))
        .query(&[("id", id.as_str())])
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert!(deleted["success"].as_bool().unwrap_or(false));
    let miss = client
        .get(format!("{}/api/products", base_url))
        .query(&[("id", id.as_str())])
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert!(miss["success"].as_bool().unwrap_or(false));
    assert!(miss["data"].is_null());

    // --- Notification OR-filter (own + broadcast) ---
    for body in [
        json!({"id": "n1", "userId": "u1", "title": "yours"}),
        json!({"id": "n2", "target": "all", "title": "broadcast"}),
        json!({"id": "n3", "userId": "u2", "title": "someone else's"}),
    ] {
        let resp = client
            .post(format!("{}/api/notifications", base_url))
            .json(&body)
            .send()
            .await?
            .json::<Value>()
            .await?;
        assert!(resp["success"].as_bool().unwrap_or(false));
        assert_eq!(resp["data"]["isRead"], json!(false));
    }
    let feed = client
        .get(format!("{}/api/notifications", base_url))
        .query(&[("userId", "u1")])
        .send()
        .await?
        .json::<Value>()
        .await?;
    let docs = feed["data"].as_array().expect("notification list");
    let mut ids: Vec<&str> = docs.iter().filter_map(|d| d["id"].as_str()).collect();
    ids.sort();
    assert_eq!(ids, vec!["n1", "n2"]);

    // Generated notification ids carry the resource prefix.
    let auto = client
        .post(format!("{}/api/notifications", base_url))
        .json(&json!({"userId": "u9", "title": "prefixed"}))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert!(auto["data"]["id"]
        .as_str()
        .unwrap()
        .starts_with("notification-"));

    // --- Promo card ordering ---
    for (id, order) in [("pc3", 3), ("pc1", 1), ("pc2", 2)] {
        let resp = client
            .post(format!("{}/api/promo-cards", base_url))
            .json(&json!({"id": id, "order": order}))
            .send()
            .await?
            .json::<Value>()
            .await?;
        assert!(resp["success"].as_bool().unwrap_or(false));
    }
    let cards = client
        .get(format!("{}/api/promo-cards", base_url))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let orders: Vec<i64> = cards["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|c| c["order"].as_i64())
        .collect();
    assert_eq!(orders, vec![1, 2, 3]);

    // --- Voucher defaults + code filter ---
    let voucher = client
        .post(format!("{}/api/vouchers", base_url))
        .json(&json!({"code": "SAVE10", "discount": 10}))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(voucher["data"]["usedCount"], json!(0));
    assert!(voucher["data"]["id"].as_str().unwrap().starts_with("voucher-"));
    let by_code = client
        .get(format!("{}/api/vouchers", base_url))
        .query(&[("code", "SAVE10")])
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(by_code["data"].as_array().unwrap().len(), 1);

    // --- Wishlist set semantics ---
    let empty = client
        .get(format!("{}/api/wishlist", base_url))
        .query(&[("userId", "w1")])
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert!(empty["success"].as_bool().unwrap_or(false));
    assert_eq!(empty["data"]["products"], json!([]));

    for _ in 0..2 {
        let added = client
            .post(format!("{}/api/wishlist", base_url))
            .json(&json!({"userId": "w1", "productId": "p1"}))
            .send()
            .await?
            .json::<Value>()
            .await?;
        assert!(added["success"].as_bool().unwrap_or(false));
    }
    let wishlist = client
        .get(format!("{}/api/wishlist", base_url))
        .query(&[("userId", "w1")])
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(wishlist["data"]["products"], json!(["p1"]));

    let removed = client
        .delete(format!("{}/api/wishlist", base_url))
        .query(&[("userId", "w1"), ("productId", "p1")])
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert!(removed["success"].as_bool().unwrap_or(false));
    let after = client
        .get(format!("{}/api/wishlist", base_url))
        .query(&[("userId", "w1")])
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(after["data"]["products"], json!([]));

    // --- Delivery settings singleton ---
    let settings = client
        .get(format!("{}/api/delivery-settings", base_url))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(settings["data"]["id"], "default");
    let threshold = settings["data"]["freeDeliveryThreshold"].clone();
    let patched = client
        .put(format!("{}/api/delivery-settings", base_url))
        .json(&json!({"deliveryFee": 15}))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(patched["data"]["deliveryFee"], json!(15));
    assert_eq!(patched["data"]["freeDeliveryThreshold"], threshold);

    // --- Error taxonomy ---
    let unknown = client
        .get(format!("{}/api/no-such-resource", base_url))
        .send()
        .await?;
    assert_eq!(unknown.status(), 404);
    let unknown = unknown.json::<Value>().await?;
    assert!(!unknown["success"].as_bool().unwrap_or(true));

    let bad_method = client
        .patch(format!("{}/api/products", base_url))
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(bad_method.status(), 405);

    let no_id = client
        .delete(format!("{}/api/products", base_url))
        .send()
        .await?;
    assert_eq!(no_id.status(), 400);

    let lost = client.get(format!("{}/nowhere", base_url)).send().await?;
    assert_eq!(lost.status(), 404);

    // --- Connectivity probe ---
    let probe = client
        .get(format!("{}/api/test-connection", base_url))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert!(probe["success"].as_bool().unwrap_or(false));
    assert_eq!(probe["data"]["collections"].as_array().unwrap().len(), 13);

    Ok(())
}
