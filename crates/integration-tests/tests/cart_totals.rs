//! Cart quantities, snapshots and totals over HTTP.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use cannabiabuds_integration_tests::TestApp;
use serde_json::{Value, json};

async fn add(app: &TestApp, id: &str) -> Value {
    let (status, cart) = app.post("/api/cart/items", json!({ "product_id": id })).await;
    assert_eq!(status, StatusCode::OK);
    cart
}

#[tokio::test]
async fn empty_cart_totals_are_zero() {
    let app = TestApp::offline();

    let (status, cart) = app.get("/api/cart").await;
    assert_eq!(status, StatusCode::OK);
    assert!(cart["lines"].as_array().unwrap().is_empty());
    assert_eq!(cart["item_count"], 0);
    assert_eq!(cart["subtotal"], "0");
    assert_eq!(cart["is_open"], false);
}

#[tokio::test]
async fn sale_prices_quantities_and_tax() {
    let app = TestApp::offline();

    add(&app, "1").await;
    add(&app, "1").await;
    let cart = add(&app, "4").await;

    assert_eq!(cart["is_open"], true);
    assert_eq!(cart["item_count"], 3);
    assert_eq!(cart["lines"][0]["product_id"], "1");
    assert_eq!(cart["lines"][0]["quantity"], 2);
    assert_eq!(cart["lines"][0]["unit_price"], "35.00");
    assert_eq!(cart["lines"][0]["line_total"], "70.00");
    assert_eq!(cart["lines"][1]["product_id"], "4");
    assert_eq!(cart["subtotal"], "95.00");
    assert_eq!(cart["tax"], "14.2500");
    assert_eq!(cart["grand_total"], "109.2500");
}

#[tokio::test]
async fn quantity_updates_and_removal() {
    let app = TestApp::offline();
    add(&app, "2").await;
    add(&app, "3").await;

    let (status, cart) = app.put("/api/cart/items/2", json!({ "quantity": 4 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["lines"][0]["quantity"], 4);
    assert_eq!(cart["item_count"], 5);

    let (_, cart) = app.put("/api/cart/items/2", json!({ "quantity": 0 })).await;
    let lines = cart["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["product_id"], "3");

    let (_, cart) = app.put("/api/cart/items/3", json!({ "quantity": -7 })).await;
    assert!(cart["lines"].as_array().unwrap().is_empty());

    // Unknown ids are a no-op, not an error.
    let (status, _) = app.delete("/api/cart/items/3").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn adding_an_unknown_product_is_not_found() {
    let app = TestApp::offline();

    let (status, body) = app.post("/api/cart/items", json!({ "product_id": "404" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (_, cart) = app.get("/api/cart").await;
    assert_eq!(cart["item_count"], 0);
}

#[tokio::test]
async fn cart_keeps_the_price_it_was_added_at() {
    let app = TestApp::offline();
    add(&app, "2").await;

    app.login().await;
    let (status, _) = app
        .patch("/api/admin/products/2", json!({ "price": "99.00" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, cart) = app.get("/api/cart").await;
    assert_eq!(cart["subtotal"], "50.00");

    let (status, _) = app.delete("/api/admin/products/2").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, cart) = app.get("/api/cart").await;
    assert_eq!(cart["lines"][0]["name"], "OG Kush");
    assert_eq!(cart["item_count"], 1);
}

#[tokio::test]
async fn toggle_and_close_drive_the_drawer() {
    let app = TestApp::offline();

    let (_, cart) = app.post_empty("/api/cart/toggle").await;
    assert_eq!(cart["is_open"], true);
    let (_, cart) = app.post_empty("/api/cart/toggle").await;
    assert_eq!(cart["is_open"], false);

    let cart = add(&app, "5").await;
    assert_eq!(cart["is_open"], true);
    let (status, cart) = app.post_empty("/api/cart/close").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["is_open"], false);
    assert_eq!(cart["item_count"], 1);
}
