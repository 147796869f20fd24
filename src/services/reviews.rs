use crate::{
    entities::{review, Product},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

/// Append-only review collection.
#[derive(Clone)]
pub struct ReviewService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl ReviewService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Records one review for a product. Rating must be 1..=5 and the
    /// comment non-empty; nothing is saved otherwise.
    #[instrument(skip(self, input))]
    pub async fn submit(
        &self,
        product_id: Uuid,
        user_id: Uuid,
        input: SubmitReviewInput,
    ) -> Result<review::Model, ServiceError> {
        input.validate()?;

        let product = Product::find_by_id(product_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))?;

        let review = review::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(product.id),
            user_id: Set(user_id),
            rating: Set(input.rating),
            comment: Set(input.comment),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db)
        .await?;

        self.event_sender
            .send_or_log(Event::ReviewSubmitted {
                product_id: product.id,
                review_id: review.id,
            })
            .await;

        info!(product_id = %product.id, review_id = %review.id, "review submitted");
        Ok(review)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitReviewInput {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(min = 1, message = "Comment must not be empty"))]
    pub comment: String,
}
