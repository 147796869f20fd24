use crate::{
    errors::ServiceError,
    handlers::products::ProductResponse,
    services::cart::CartView,
    session::Session,
    ApiResponse, AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

// Response DTOs

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLineResponse {
    pub product: ProductResponse,
    pub quantity: u32,
    pub line_total: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartResponse {
    pub lines: Vec<CartLineResponse>,
    pub subtotal: Decimal,
}

impl From<CartView> for CartResponse {
    fn from(view: CartView) -> Self {
        Self {
            lines: view
                .lines
                .into_iter()
                .map(|line| CartLineResponse {
                    product: line.product.into(),
                    quantity: line.quantity,
                    line_total: line.line_total,
                })
                .collect(),
            subtotal: view.subtotal,
        }
    }
}

/// Current cart contents, resolved against the catalog
#[utoipa::path(
    get,
    path = "/cart",
    responses(
        (status = 200, description = "Cart contents", body = ApiResponse<CartResponse>),
        (status = 404, description = "A cart entry references a vanished product", body = crate::errors::ErrorResponse),
    )
)]
pub async fn view_cart(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<ApiResponse<CartResponse>>, ServiceError> {
    let view = state.services.cart.resolve(&session.cart()).await?;
    Ok(Json(ApiResponse::success(view.into())))
}

/// Add one unit of a product to the cart
#[utoipa::path(
    post,
    path = "/cart/add/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Updated cart", body = ApiResponse<CartResponse>),
        (status = 404, description = "Unknown product", body = crate::errors::ErrorResponse),
    )
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CartResponse>>, ServiceError> {
    let mut cart = session.cart();
    let product = state.services.cart.add_item(&mut cart, id).await?;
    session.set_cart(cart);

    let view = state.services.cart.resolve(&session.cart()).await?;
    let mut response = ApiResponse::success(CartResponse::from(view));
    response.message = Some(format!("{} added to cart!", product.name));
    Ok(Json(response))
}

/// Remove a product's entry from the cart entirely
#[utoipa::path(
    post,
    path = "/cart/remove/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Updated cart", body = ApiResponse<CartResponse>),
    )
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CartResponse>>, ServiceError> {
    let mut cart = session.cart();
    let removed = state.services.cart.remove_item(&mut cart, id);
    session.set_cart(cart);

    let view = state.services.cart.resolve(&session.cart()).await?;
    let mut response = ApiResponse::success(CartResponse::from(view));
    if removed {
        response.message = Some("Item removed from cart!".to_string());
    }
    Ok(Json(response))
}
