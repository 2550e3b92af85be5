//! End-to-end tests for the public and admin HTTP API.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use reqwest::{Method, StatusCode};
use serde_json::{Value, json};

use flore_integration_tests::{ADMIN_PASSWORD, TestServer};

// ============================================================================
// Public surface
// ============================================================================

#[tokio::test]
async fn test_health_and_root() {
    let dir = tempfile::tempdir().unwrap();
    let server = TestServer::start(&dir.path().join("db.json")).await;

    let resp = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = server
        .client
        .get(server.url("/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_seeded_catalog_is_public() {
    let dir = tempfile::tempdir().unwrap();
    let server = TestServer::start(&dir.path().join("db.json")).await;

    let products: Vec<Value> = server
        .client
        .get(server.url("/api/products"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(products.len(), 2);
    assert!(products.iter().all(|p| p.get("id").is_some()));

    let product: Value = server
        .client
        .get(server.url("/api/products/1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(product["name"], "Buquê de Rosas Vermelhas");

    let categories: Vec<Value> = server
        .client
        .get(server.url("/api/categories"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ids: Vec<&str> = categories.iter().filter_map(|c| c["id"].as_str()).collect();
    assert_eq!(ids, ["buques", "arranjos"]);

    let settings: Value = server
        .client
        .get(server.url("/api/settings"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(settings["siteName"], "Florê");

    let missing = server
        .client
        .get(server.url("/api/products/does-not-exist"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_admin_routes_reject_missing_and_bad_tokens() {
    let dir = tempfile::tempdir().unwrap();
    let server = TestServer::start(&dir.path().join("db.json")).await;

    let resp = server
        .client
        .get(server.url("/api/admin/orders"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = server
        .admin(Method::GET, "/api/admin/orders", "not.a.token")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = server
        .admin(Method::POST, "/api/admin/products", "not.a.token")
        .json(&json!({ "name": "Tulipas", "price": 10.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let products: Vec<Value> = server
        .client
        .get(server.url("/api/products"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(products.len(), 2);
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let server = TestServer::start(&dir.path().join("db.json")).await;

    let resp = server
        .client
        .post(server.url("/api/admin/login"))
        .json(&json!({ "password": format!("{ADMIN_PASSWORD}-wrong") }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Invalid credentials");

    let token = server.login().await;
    let resp = server
        .admin(Method::GET, "/api/admin/orders", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let orders: Vec<Value> = resp.json().await.unwrap();
    assert!(orders.is_empty());
}

// ============================================================================
// Catalog administration
// ============================================================================

#[tokio::test]
async fn test_product_and_category_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let server = TestServer::start(&dir.path().join("db.json")).await;
    let token = server.login().await;

    let resp = server
        .admin(Method::POST, "/api/admin/categories", &token)
        .json(&json!({ "name": "Cestas de Presente", "description": "Cestas montadas" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let category: Value = resp.json().await.unwrap();
    let category_id = category["id"].as_str().unwrap().to_string();

    let resp = server
        .admin(Method::POST, "/api/admin/products", &token)
        .json(&json!({
            "name": "Cesta de Café da Manhã",
            "price": 129.9,
            "category": category_id,
            "tags": ["presente"]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let product: Value = resp.json().await.unwrap();
    let product_id = product["id"].as_str().unwrap().to_string();

    let resp = server
        .admin(Method::PUT, &format!("/api/admin/products/{product_id}"), &token)
        .json(&json!({ "featured": true, "price": 119.9 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["id"], product_id.as_str());
    assert_eq!(updated["featured"], true);
    assert_eq!(updated["name"], "Cesta de Café da Manhã");

    let public: Vec<Value> = server
        .client
        .get(server.url("/api/products"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(public.len(), 3);

    let resp = server
        .admin(Method::PUT, &format!("/api/admin/products/{product_id}"), &token)
        .json(&json!({ "price": -1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = server
        .admin(Method::DELETE, &format!("/api/admin/products/{product_id}"), &token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = server
        .admin(Method::DELETE, &format!("/api/admin/products/{product_id}"), &token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = server
        .admin(Method::DELETE, &format!("/api/admin/categories/{category_id}"), &token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_settings_merge_keeps_unspecified_keys() {
    let dir = tempfile::tempdir().unwrap();
    let server = TestServer::start(&dir.path().join("db.json")).await;
    let token = server.login().await;

    let resp = server
        .admin(Method::POST, "/api/admin/settings", &token)
        .json(&json!({ "whatsapp": "5511988887777", "instagram": "@flore" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let settings: Value = server
        .client
        .get(server.url("/api/settings"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(settings["whatsapp"], "5511988887777");
    assert_eq!(settings["instagram"], "@flore");
    assert_eq!(settings["siteName"], "Florê");
}

// ============================================================================
// Analytics
// ============================================================================

#[tokio::test]
async fn test_concurrent_analytics_events_are_all_kept() {
    let dir = tempfile::tempdir().unwrap();
    let server = TestServer::start(&dir.path().join("db.json")).await;

    let mut handles = Vec::new();
    for i in 0..20 {
        let client = server.client.clone();
        let url = server.url("/api/analytics");
        handles.push(tokio::spawn(async move {
            client
                .post(url)
                .json(&json!({ "type": "page_view", "page": format!("/produto/{i}") }))
                .send()
                .await
                .unwrap()
                .status()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::CREATED);
    }

    let token = server.login().await;
    let events: Vec<Value> = server
        .admin(Method::GET, "/api/admin/analytics", &token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(events.len(), 20);
    assert!(events.iter().all(|e| e["id"].is_string() && e["timestamp"].is_string()));

    let dashboard: Value = server
        .admin(Method::GET, "/api/admin/analytics/dashboard", &token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(dashboard["totalEvents"], 20);
    assert_eq!(dashboard["totalProducts"], 2);
    assert_eq!(dashboard["totalOrders"], 0);
}

#[tokio::test]
async fn test_analytics_retention_bound() {
    let dir = tempfile::tempdir().unwrap();
    let server = TestServer::start_with(&dir.path().join("db.json"), |config| {
        config.analytics_max_events = std::num::NonZeroUsize::new(3);
    })
    .await;

    for i in 0..5 {
        let resp = server
            .client
            .post(server.url("/api/analytics"))
            .json(&json!({ "type": "click", "seq": i }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let token = server.login().await;
    let events: Vec<Value> = server
        .admin(Method::GET, "/api/admin/analytics", &token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let seqs: Vec<i64> = events.iter().filter_map(|e| e["seq"].as_i64()).collect();
    assert_eq!(seqs, [2, 3, 4]);
}

// ============================================================================
// Persistence
// ============================================================================

#[tokio::test]
async fn test_writes_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db.json");

    let server = TestServer::start(&path).await;
    let token = server.login().await;
    let resp = server
        .admin(Method::POST, "/api/admin/products", &token)
        .json(&json!({ "name": "Orquídea Branca", "price": 89.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    server.stop().await;

    // The store already holds data, so no bootstrap password is needed.
    let server = TestServer::start_with(&path, |config| config.admin_password = None).await;
    let products: Vec<Value> = server
        .client
        .get(server.url("/api/products"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(products.len(), 3);
    assert!(products.iter().any(|p| p["name"] == "Orquídea Branca"));

    // The bootstrap password still logs in after the restart.
    let token = server.login().await;
    assert!(!token.is_empty());
}
