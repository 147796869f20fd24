use crate::{
    auth::CurrentUser,
    errors::ServiceError,
    handlers::orders::{OrderItemResponse, OrderResponse},
    session::Session,
    ApiResponse, AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub order: OrderResponse,
    pub items: Vec<OrderItemResponse>,
}

/// Convert the session cart into a persisted order
///
/// Cart entries whose product no longer exists are dropped from the order;
/// each one is reported in `errors` while the checkout as a whole still
/// succeeds. The cart is cleared either way.
#[utoipa::path(
    post,
    path = "/checkout",
    responses(
        (status = 201, description = "Order placed", body = ApiResponse<CheckoutResponse>),
        (status = 400, description = "Cart is empty", body = crate::errors::ErrorResponse),
        (status = 401, description = "Login required", body = crate::errors::ErrorResponse),
    )
)]
pub async fn checkout(
    State(state): State<AppState>,
    user: CurrentUser,
    session: Session,
) -> Result<(StatusCode, Json<ApiResponse<CheckoutResponse>>), ServiceError> {
    let cart = session.cart();
    let outcome = state.services.checkout.place_order(user.id, &cart).await?;

    // The cart is cleared even when some entries were dropped.
    session.clear_cart();

    let mut response = ApiResponse::success(CheckoutResponse {
        order: outcome.order.into(),
        items: outcome.items.into_iter().map(Into::into).collect(),
    });
    response.message = Some("Order placed successfully!".to_string());
    if !outcome.skipped.is_empty() {
        response.errors = Some(outcome.skipped);
    }

    Ok((StatusCode::CREATED, Json(response)))
}
