//! Integration tests for review submission on the product detail route.

mod common;

use axum::http::StatusCode;
use common::{response_json, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;

#[tokio::test]
async fn submitting_a_review_appends_it_to_the_product() {
    let app = TestApp::new().await;
    let product = app
        .seed_product("Green Tea", "Loose leaf", dec!(4.50), None)
        .await;
    let user = app.seed_user("alice", "correct-horse-battery").await;

    let mut client = app.client();
    client.login("alice", "correct-horse-battery").await;

    let response = client
        .post(
            &format!("/product/{}", product.id),
            Some(json!({ "rating": 5, "comment": "Lovely and grassy." })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Review submitted successfully!");
    assert_eq!(body["data"]["rating"], 5);
    assert_eq!(body["data"]["user_id"], user.id.to_string());

    // The review shows up on the product detail page.
    let detail = response_json(client.get(&format!("/product/{}", product.id)).await).await;
    let reviews = detail["data"]["reviews"].as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["comment"], "Lovely and grassy.");
}

#[tokio::test]
async fn review_submission_requires_authentication() {
    let app = TestApp::new().await;
    let product = app
        .seed_product("Green Tea", "Loose leaf", dec!(4.50), None)
        .await;

    let mut client = app.client();
    let response = client
        .post(
            &format!("/product/{}", product.id),
            Some(json!({ "rating": 4, "comment": "Nice." })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn out_of_range_rating_is_rejected_without_saving() {
    let app = TestApp::new().await;
    let product = app
        .seed_product("Green Tea", "Loose leaf", dec!(4.50), None)
        .await;
    app.seed_user("bob", "correct-horse-battery").await;

    let mut client = app.client();
    client.login("bob", "correct-horse-battery").await;

    for rating in [0, 6] {
        let response = client
            .post(
                &format!("/product/{}", product.id),
                Some(json!({ "rating": rating, "comment": "Whatever." })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // An empty comment is rejected too.
    let response = client
        .post(
            &format!("/product/{}", product.id),
            Some(json!({ "rating": 3, "comment": "" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let detail = response_json(client.get(&format!("/product/{}", product.id)).await).await;
    assert_eq!(detail["data"]["reviews"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn reviewing_an_unknown_product_is_404() {
    let app = TestApp::new().await;
    app.seed_user("carol", "correct-horse-battery").await;

    let mut client = app.client();
    client.login("carol", "correct-horse-battery").await;

    let response = client
        .post(
            "/product/00000000-0000-0000-0000-000000000000",
            Some(json!({ "rating": 5, "comment": "Ghost product." })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
