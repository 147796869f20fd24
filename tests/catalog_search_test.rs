//! Integration tests for catalog browsing and substring search.

mod common;

use axum::http::StatusCode;
use common::{response_json, TestApp};
use rust_decimal_macros::dec;

#[tokio::test]
async fn listing_returns_all_products_and_categories() {
    let app = TestApp::new().await;
    let teas = app.seed_category("Teas", "teas").await;
    app.seed_product("Green Tea", "Loose leaf", dec!(4.50), Some(teas.id))
        .await;
    app.seed_product("Teapot", "Cast iron", dec!(30.00), None)
        .await;

    let mut client = app.client();
    let body = response_json(client.get("/products").await).await;
    assert_eq!(body["data"]["products"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["categories"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["categories"][0]["slug"], "teas");
}

#[tokio::test]
async fn category_filter_narrows_the_listing() {
    let app = TestApp::new().await;
    let teas = app.seed_category("Teas", "teas").await;
    let hardware = app.seed_category("Hardware", "hardware").await;
    app.seed_product("Green Tea", "Loose leaf", dec!(4.50), Some(teas.id))
        .await;
    app.seed_product("Kettle", "Electric", dec!(25.00), Some(hardware.id))
        .await;
    app.seed_product("Gift Card", "Uncategorized", dec!(10.00), None)
        .await;

    let mut client = app.client();
    let body = response_json(client.get("/category/teas").await).await;
    let products = body["data"]["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["name"], "Green Tea");
}

#[tokio::test]
async fn unknown_category_slug_is_404() {
    let app = TestApp::new().await;

    let mut client = app.client();
    let response = client.get("/category/no-such-slug").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn product_detail_includes_reviews_and_missing_product_is_404() {
    let app = TestApp::new().await;
    let product = app
        .seed_product("Green Tea", "Loose leaf", dec!(4.50), None)
        .await;

    let mut client = app.client();
    let body = response_json(client.get(&format!("/product/{}", product.id)).await).await;
    assert_eq!(body["data"]["product"]["name"], "Green Tea");
    assert_eq!(body["data"]["reviews"].as_array().unwrap().len(), 0);

    let response = client
        .get("/product/00000000-0000-0000-0000-000000000000")
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_matches_name_and_description_case_insensitively() {
    let app = TestApp::new().await;
    app.seed_product("Green Tea", "Loose leaf sencha", dec!(4.50), None)
        .await;
    app.seed_product("Teapot", "Cast iron, holds TEA nicely", dec!(30.00), None)
        .await;
    app.seed_product("Kettle", "Electric", dec!(25.00), None)
        .await;

    let mut client = app.client();

    // Matches "Green Tea" by name and "Teapot" by name and description.
    let body = response_json(client.get("/search?q=tea").await).await;
    let products = body["data"]["products"].as_array().unwrap();
    assert_eq!(products.len(), 2);

    // Upper-cased query matches the same set.
    let body = response_json(client.get("/search?q=TEA").await).await;
    assert_eq!(body["data"]["products"].as_array().unwrap().len(), 2);

    // Description-only match.
    let body = response_json(client.get("/search?q=sencha").await).await;
    let products = body["data"]["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["name"], "Green Tea");

    // No match anywhere.
    let body = response_json(client.get("/search?q=umbrella").await).await;
    assert_eq!(body["data"]["products"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn empty_query_matches_every_product() {
    let app = TestApp::new().await;
    app.seed_product("Green Tea", "Loose leaf", dec!(4.50), None)
        .await;
    app.seed_product("Kettle", "Electric", dec!(25.00), None)
        .await;

    let mut client = app.client();
    let body = response_json(client.get("/search?q=").await).await;
    assert_eq!(body["data"]["products"].as_array().unwrap().len(), 2);

    // Omitting the parameter behaves the same as an empty query.
    let body = response_json(client.get("/search").await).await;
    assert_eq!(body["data"]["products"].as_array().unwrap().len(), 2);
}
