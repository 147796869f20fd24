//! Integration tests for the order-history projection.

mod common;

use axum::http::StatusCode;
use common::{response_json, TestApp};
use rust_decimal_macros::dec;

#[tokio::test]
async fn history_lists_only_the_callers_orders_newest_first() {
    let app = TestApp::new().await;
    let tea = app
        .seed_product("Green Tea", "Loose leaf", dec!(4.50), None)
        .await;
    let pot = app
        .seed_product("Teapot", "Cast iron", dec!(30.00), None)
        .await;
    app.seed_user("alice", "correct-horse-battery").await;
    app.seed_user("bob", "correct-horse-battery").await;

    // Alice places two orders, in sequence.
    let mut alice = app.client();
    alice.login("alice", "correct-horse-battery").await;
    alice.post(&format!("/cart/add/{}", tea.id), None).await;
    alice.post("/checkout", None).await;
    alice.post(&format!("/cart/add/{}", pot.id), None).await;
    alice.post("/checkout", None).await;

    // Bob places one of his own.
    let mut bob = app.client();
    bob.login("bob", "correct-horse-battery").await;
    bob.post(&format!("/cart/add/{}", tea.id), None).await;
    bob.post("/checkout", None).await;

    let body = response_json(alice.get("/order-history").await).await;
    let orders = body["data"].as_array().unwrap();
    assert_eq!(orders.len(), 2);

    // Newest first: the teapot order was placed after the tea order.
    let newest_total: rust_decimal::Decimal =
        orders[0]["total_price"].as_str().unwrap().parse().unwrap();
    let oldest_total: rust_decimal::Decimal =
        orders[1]["total_price"].as_str().unwrap().parse().unwrap();
    assert_eq!(newest_total, dec!(30.00));
    assert_eq!(oldest_total, dec!(4.50));

    // Each entry carries its line items.
    assert_eq!(orders[0]["items"].as_array().unwrap().len(), 1);
    assert_eq!(orders[0]["items"][0]["product_id"], pot.id.to_string());
}

#[tokio::test]
async fn history_is_empty_for_a_user_with_no_orders() {
    let app = TestApp::new().await;
    app.seed_user("carol", "correct-horse-battery").await;

    let mut client = app.client();
    client.login("carol", "correct-horse-battery").await;

    let body = response_json(client.get("/order-history").await).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn history_requires_authentication() {
    let app = TestApp::new().await;

    let mut client = app.client();
    let response = client.get("/order-history").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn order_success_confirmation_is_public() {
    let app = TestApp::new().await;

    let mut client = app.client();
    let response = client.get("/order-success").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Order placed successfully!");
}
