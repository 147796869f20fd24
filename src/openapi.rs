//! OpenAPI document for the storefront HTTP surface.

use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

use crate::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        version = "0.1.0",
        description = r#"
# Storefront API

An online storefront backend: browse products by category, search, manage a
session-scoped shopping cart, authenticate, check out into persisted orders,
and leave reviews.

## Sessions

State that spans requests (the cart, the logged-in user) lives in a
server-side session identified by an opaque `HttpOnly` cookie. The cookie is
set on first contact; no client-side state is required.

## Error Handling

Failed requests return a consistent error envelope with an appropriate HTTP
status code:

```json
{
  "error": "Not Found",
  "message": "Product 550e8400-e29b-41d4-a716-446655440000 not found",
  "timestamp": "2025-08-05T10:30:00.000Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(
        crate::handlers::products::list_products,
        crate::handlers::products::products_by_category,
        crate::handlers::products::product_detail,
        crate::handlers::products::submit_review,
        crate::handlers::products::search_products,
        crate::handlers::cart::view_cart,
        crate::handlers::cart::add_to_cart,
        crate::handlers::cart::remove_from_cart,
        crate::handlers::auth::signup,
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::auth::logout,
        crate::handlers::checkout::checkout,
        crate::handlers::orders::order_success,
        crate::handlers::orders::order_history,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::handlers::products::CategoryResponse,
        crate::handlers::products::ProductResponse,
        crate::handlers::products::ReviewResponse,
        crate::handlers::products::ProductListResponse,
        crate::handlers::products::ProductDetailResponse,
        crate::handlers::products::SearchResponse,
        crate::handlers::products::ReviewRequest,
        crate::handlers::cart::CartLineResponse,
        crate::handlers::cart::CartResponse,
        crate::handlers::auth::UserResponse,
        crate::handlers::auth::SignupRequest,
        crate::handlers::auth::RegisterRequest,
        crate::handlers::auth::LoginRequest,
        crate::handlers::checkout::CheckoutResponse,
        crate::handlers::orders::OrderResponse,
        crate::handlers::orders::OrderItemResponse,
        crate::handlers::orders::OrderWithItemsResponse,
    )),
    tags(
        (name = "Catalog", description = "Product listing, detail and search"),
        (name = "Cart", description = "Session cart mutation"),
        (name = "Auth", description = "Accounts and sessions"),
        (name = "Orders", description = "Checkout and order history"),
    )
)]
pub struct ApiDoc;

/// Serves the OpenAPI document as JSON.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/api-docs/openapi.json",
        get(|| async { Json(ApiDoc::openapi()) }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_includes_checkout_path() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/checkout"));
        assert!(doc.paths.paths.contains_key("/order-history"));
    }
}
