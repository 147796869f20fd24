use crate::{
    entities::{category, product, review, Category, Product, Review},
    errors::ServiceError,
};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, QueryOrder,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Read side of the catalog: listings, detail and search. Checkout queries
/// the catalog but never mutates it.
#[derive(Clone)]
pub struct CatalogService {
    db: Arc<DatabaseConnection>,
}

impl CatalogService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Product listing, optionally narrowed to one category by slug. The
    /// full category list rides along for navigation.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        category_slug: Option<&str>,
    ) -> Result<ProductListing, ServiceError> {
        let categories = Category::find()
            .order_by_asc(category::Column::Name)
            .all(&*self.db)
            .await?;

        let products = match category_slug {
            Some(slug) => {
                let cat = Category::find()
                    .filter(category::Column::Slug.eq(slug))
                    .one(&*self.db)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("Category '{}' not found", slug))
                    })?;
                Product::find()
                    .filter(product::Column::CategoryId.eq(cat.id))
                    .all(&*self.db)
                    .await?
            }
            None => Product::find().all(&*self.db).await?,
        };

        Ok(ProductListing {
            products,
            categories,
        })
    }

    /// Product detail plus its reviews, newest first.
    #[instrument(skip(self))]
    pub async fn get_product(&self, product_id: Uuid) -> Result<ProductDetail, ServiceError> {
        let product = Product::find_by_id(product_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))?;

        let reviews = product
            .find_related(Review)
            .order_by_desc(review::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        Ok(ProductDetail { product, reviews })
    }

    /// Case-insensitive substring match of `query` against product name OR
    /// description. No ranking, no tokenization; the empty query matches
    /// every product.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<product::Model>, ServiceError> {
        let pattern = format!("%{}%", query.to_lowercase());

        let products = Product::find()
            .filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(product::Column::Name)))
                            .like(pattern.clone()),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(product::Column::Description)))
                            .like(pattern),
                    ),
            )
            .all(&*self.db)
            .await?;

        Ok(products)
    }
}

/// Listing payload: products plus all categories.
#[derive(Debug, Clone)]
pub struct ProductListing {
    pub products: Vec<product::Model>,
    pub categories: Vec<category::Model>,
}

/// Detail payload: one product plus its reviews.
#[derive(Debug, Clone)]
pub struct ProductDetail {
    pub product: product::Model,
    pub reviews: Vec<review::Model>,
}
