//! Storefront API Library
//!
//! This crate provides the core functionality for the storefront API:
//! catalog browsing, session carts, checkout, order history and reviews.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod middleware_helpers;
pub mod openapi;
pub mod services;
pub mod session;

use axum::{
    response::Json,
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

use session::{session_middleware, SessionLayer};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

// Common response wrapper
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors: None,
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// The storefront route table.
///
/// Protected routes (checkout, order history, review submission) rely on
/// the [`auth::CurrentUser`] extractor; everything else is anonymous.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/products", get(handlers::products::list_products))
        .route(
            "/category/:slug",
            get(handlers::products::products_by_category),
        )
        .route(
            "/product/:id",
            get(handlers::products::product_detail).post(handlers::products::submit_review),
        )
        .route("/cart", get(handlers::cart::view_cart))
        .route(
            "/cart/add/:id",
            get(handlers::cart::add_to_cart).post(handlers::cart::add_to_cart),
        )
        .route(
            "/cart/remove/:id",
            get(handlers::cart::remove_from_cart).post(handlers::cart::remove_from_cart),
        )
        .route(
            "/login",
            get(handlers::auth::login_form).post(handlers::auth::login),
        )
        .route(
            "/signup",
            get(handlers::auth::signup_form).post(handlers::auth::signup),
        )
        .route(
            "/register",
            get(handlers::auth::register_form).post(handlers::auth::register),
        )
        .route(
            "/logout",
            get(handlers::auth::logout).post(handlers::auth::logout),
        )
        .route("/checkout", post(handlers::checkout::checkout))
        .route("/order-success", get(handlers::orders::order_success))
        .route("/order-history", get(handlers::orders::order_history))
        .route("/search", get(handlers::products::search_products))
        .route("/health", get(health_check))
        .merge(openapi::routes())
}

/// Composes the full application router: storefront routes plus the
/// session middleware that installs the request-scoped cart handle.
pub fn app_router(state: AppState, session_layer: SessionLayer) -> Router {
    routes()
        .layer(axum::middleware::from_fn_with_state(
            session_layer,
            session_middleware,
        ))
        // Every request carries a request id for traceability.
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}

async fn home() -> Json<ApiResponse<Value>> {
    let version = env!("CARGO_PKG_VERSION");
    let status_data = json!({
        "status": "ok",
        "service": "storefront-api",
        "version": version,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Json(ApiResponse::success(status_data))
}

async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let db_status = match db::check_connection(&state.db).await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(health_data)))
}
