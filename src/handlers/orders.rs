use crate::{
    auth::CurrentUser,
    entities::{order, order_item},
    errors::ServiceError,
    services::orders::OrderWithItems,
    ApiResponse, AppState,
};
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Value};
use utoipa::ToSchema;
use uuid::Uuid;

// Response DTOs

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<order::Model> for OrderResponse {
    fn from(model: order::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            total_price: model.total_price,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
}

impl From<order_item::Model> for OrderItemResponse {
    fn from(model: order_item::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            product_id: model.product_id,
            quantity: model.quantity,
            price: model.price,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItemsResponse {
    #[serde(flatten)]
    pub order: OrderResponse,
    pub items: Vec<OrderItemResponse>,
}

impl From<OrderWithItems> for OrderWithItemsResponse {
    fn from(entry: OrderWithItems) -> Self {
        Self {
            order: entry.order.into(),
            items: entry.items.into_iter().map(Into::into).collect(),
        }
    }
}

/// Order confirmation page
#[utoipa::path(
    get,
    path = "/order-success",
    responses(
        (status = 200, description = "Confirmation", body = ApiResponse<Value>),
    )
)]
pub async fn order_success() -> Json<ApiResponse<Value>> {
    let mut response = ApiResponse::success(json!({ "confirmed": true }));
    response.message = Some("Order placed successfully!".to_string());
    Json(response)
}

/// The caller's past orders, newest first
#[utoipa::path(
    get,
    path = "/order-history",
    responses(
        (status = 200, description = "Order history", body = ApiResponse<Vec<OrderWithItemsResponse>>),
        (status = 401, description = "Login required", body = crate::errors::ErrorResponse),
    )
)]
pub async fn order_history(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<OrderWithItemsResponse>>>, ServiceError> {
    let orders = state.services.orders.history(user.id).await?;
    Ok(Json(ApiResponse::success(
        orders.into_iter().map(Into::into).collect(),
    )))
}
