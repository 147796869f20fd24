use crate::{
    entities::{product, Product},
    errors::ServiceError,
    session::Cart,
};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Session-cart operations. The cart itself lives in the caller's session;
/// this service only mutates the mapping handed to it and resolves entries
/// against the catalog.
#[derive(Clone)]
pub struct CartService {
    db: Arc<DatabaseConnection>,
}

impl CartService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Adds one unit of the product to the cart, creating the entry at
    /// quantity 1 when absent. The product must exist at add time.
    #[instrument(skip(self, cart))]
    pub async fn add_item(
        &self,
        cart: &mut Cart,
        product_id: Uuid,
    ) -> Result<product::Model, ServiceError> {
        let product = Product::find_by_id(product_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))?;

        *cart.entry(product_id.to_string()).or_insert(0) += 1;

        Ok(product)
    }

    /// Removes the product's entry entirely: one removal clears all
    /// quantity of that product, not one unit. Returns whether an entry
    /// was present; removing an absent id is a no-op.
    pub fn remove_item(&self, cart: &mut Cart, product_id: Uuid) -> bool {
        cart.remove(&product_id.to_string()).is_some()
    }

    /// Resolves every cart entry against the catalog for the cart view.
    /// An entry whose product has vanished fails the whole view with
    /// NotFound.
    #[instrument(skip(self, cart))]
    pub async fn resolve(&self, cart: &Cart) -> Result<CartView, ServiceError> {
        let mut lines = Vec::with_capacity(cart.len());
        let mut subtotal = Decimal::ZERO;

        for (product_id, &quantity) in cart {
            let product = match product_id.parse::<Uuid>() {
                Ok(id) => Product::find_by_id(id).one(&*self.db).await?,
                Err(_) => None,
            }
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))?;

            let line_total = product.price * Decimal::from(quantity);
            subtotal += line_total;
            lines.push(CartLine {
                product,
                quantity,
                line_total,
            });
        }

        Ok(CartView { lines, subtotal })
    }
}

#[derive(Debug, Clone)]
pub struct CartLine {
    pub product: product::Model,
    pub quantity: u32,
    pub line_total: Decimal,
}

#[derive(Debug, Clone)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub subtotal: Decimal,
}
