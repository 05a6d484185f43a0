//! Catalog administration behind the session gate.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use cannabiabuds_integration_tests::TestApp;
use serde_json::json;

fn draft() -> serde_json::Value {
    json!({
        "name": "Blue Dream Gummies",
        "category": "Edibles",
        "strain_type": "Hybrid",
        "price": "22.00",
        "thc": 10.0,
        "cbd": 0.0,
        "description": "Berry gummies, 10mg each.",
        "effects": ["Relaxed", "Happy"],
        "flavors": ["Blueberry"]
    })
}

#[tokio::test]
async fn anonymous_shopper_cannot_touch_the_catalog() {
    let app = TestApp::offline();

    let (status, body) = app.post("/api/admin/products", draft()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Admin access required");

    let (status, _) = app.patch("/api/admin/products/1", json!({ "price": "1.00" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.delete("/api/admin/products/1").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, products) = app.get("/api/products").await;
    assert_eq!(products.as_array().unwrap().len(), 6);
    assert_eq!(products[0]["price"], "45.00");
}

#[tokio::test]
async fn admin_lifecycle_create_update_delete() {
    let app = TestApp::offline();
    app.login().await;

    let (_, session) = app.get("/api/session").await;
    assert_eq!(session["is_admin"], true);
    assert_eq!(session["role"], "admin");

    let (status, created) = app.post("/api/admin/products", draft()).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_owned();
    assert_eq!(created["name"], "Blue Dream Gummies");
    assert_eq!(created["in_stock"], true);
    assert_eq!(created["rating"], 0.0);

    let (_, products) = app.get("/api/products").await;
    let products = products.as_array().unwrap();
    assert_eq!(products.len(), 7);
    assert_eq!(products.last().unwrap()["id"], id.as_str());

    let (status, updated) = app
        .patch(
            &format!("/api/admin/products/{id}"),
            json!({ "sale_price": "18.00" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["sale_price"], "18.00");
    assert_eq!(updated["name"], "Blue Dream Gummies");

    let (_, deals) = app.get("/api/products?deals=true").await;
    assert!(deals.as_array().unwrap().iter().any(|p| p["id"] == id.as_str()));

    let (status, _) = app.delete(&format!("/api/admin/products/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get(&format!("/api/products/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_drafts_are_rejected_without_side_effects() {
    let app = TestApp::offline();
    app.login().await;

    let mut nameless = draft();
    nameless["name"] = json!("   ");
    let (status, _) = app.post("/api/admin/products", nameless).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let mut pricey_sale = draft();
    pricey_sale["sale_price"] = json!("30.00");
    let (status, _) = app.post("/api/admin/products", pricey_sale).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, products) = app.get("/api/products").await;
    assert_eq!(products.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn logout_closes_the_gate_again() {
    let app = TestApp::offline();
    app.login().await;

    let (status, _) = app.delete("/api/admin/products/6").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    app.logout().await;
    let (_, session) = app.get("/api/session").await;
    assert_eq!(session["is_admin"], false);
    assert!(session["user"].is_null());

    let (status, _) = app.delete("/api/admin/products/5").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get("/api/products/5").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_product_is_not_found_for_admins() {
    let app = TestApp::offline();
    app.login().await;

    let (status, _) = app.delete("/api/admin/products/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
