use crate::{
    entities::{order, order_item, Product},
    errors::ServiceError,
    events::{Event, EventSender},
    session::Cart,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Checkout: converts a session cart into a persisted order with its line
/// items. The only multi-entity write workflow in the system.
#[derive(Clone)]
pub struct CheckoutService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl CheckoutService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Places an order from the given cart.
    ///
    /// The whole workflow runs in one transaction: order insert, one item
    /// insert per resolvable cart entry, then the total update. A failure
    /// anywhere rolls the order back entirely.
    ///
    /// Cart entries whose product no longer exists are dropped from
    /// persisted state and reported back as one message each in
    /// [`CheckoutOutcome::skipped`]. The order is created regardless, even
    /// when every entry was dropped (total 0, zero items) — callers must
    /// inspect `skipped` to distinguish a full from a partial success.
    ///
    /// Each line item copies the product's current price, so later catalog
    /// price changes never rewrite history.
    #[instrument(skip(self, cart), fields(entries = cart.len()))]
    pub async fn place_order(
        &self,
        user_id: Uuid,
        cart: &Cart,
    ) -> Result<CheckoutOutcome, ServiceError> {
        if cart.is_empty() {
            return Err(ServiceError::InvalidOperation(
                "Your cart is empty!".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        let order = order::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            total_price: Set(Decimal::ZERO),
            created_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await?;

        let mut total_price = Decimal::ZERO;
        let mut items = Vec::new();
        let mut skipped = Vec::new();

        for (product_id, &quantity) in cart {
            let product = match product_id.parse::<Uuid>() {
                Ok(id) => Product::find_by_id(id).one(&txn).await?,
                Err(_) => None,
            };

            let Some(product) = product else {
                warn!(%product_id, "dropping cart entry: product no longer exists");
                skipped.push(format!("Product with ID {} not found!", product_id));
                continue;
            };

            total_price += product.price * Decimal::from(quantity);

            let item = order_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order.id),
                product_id: Set(product.id),
                quantity: Set(quantity as i32),
                price: Set(product.price),
            }
            .insert(&txn)
            .await?;
            items.push(item);
        }

        let mut finalized: order::ActiveModel = order.into();
        finalized.total_price = Set(total_price);
        let order = finalized.update(&txn).await?;

        txn.commit().await?;

        if skipped.is_empty() {
            self.event_sender
                .send_or_log(Event::OrderPlaced(order.id))
                .await;
        } else {
            self.event_sender
                .send_or_log(Event::OrderPartiallyFulfilled {
                    order_id: order.id,
                    dropped_entries: skipped.len(),
                })
                .await;
        }

        info!(
            order_id = %order.id,
            total = %order.total_price,
            items = items.len(),
            dropped = skipped.len(),
            "checkout completed"
        );

        Ok(CheckoutOutcome {
            order,
            items,
            skipped,
        })
    }
}

/// Result of a completed checkout.
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    pub order: order::Model,
    pub items: Vec<order_item::Model>,
    /// One user-visible message per cart entry dropped because its product
    /// no longer exists.
    pub skipped: Vec<String>,
}
