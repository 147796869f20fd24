use std::sync::Arc;

use crate::{
    db::DbPool,
    events::EventSender,
    services::{
        CartService, CatalogService, CheckoutService, OrderService, ReviewService, UserService,
    },
};

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod common;
pub mod orders;
pub mod products;

/// Aggregated services used by HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Arc<CatalogService>,
    pub cart: Arc<CartService>,
    pub checkout: Arc<CheckoutService>,
    pub orders: Arc<OrderService>,
    pub reviews: Arc<ReviewService>,
    pub users: Arc<UserService>,
}

impl AppServices {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            catalog: Arc::new(CatalogService::new(db.clone())),
            cart: Arc::new(CartService::new(db.clone())),
            checkout: Arc::new(CheckoutService::new(db.clone(), event_sender.clone())),
            orders: Arc::new(OrderService::new(db.clone())),
            reviews: Arc::new(ReviewService::new(db.clone(), event_sender.clone())),
            users: Arc::new(UserService::new(db, event_sender)),
        }
    }
}
