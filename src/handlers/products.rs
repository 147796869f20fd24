use crate::{
    auth::CurrentUser,
    entities::{category, product, review},
    errors::ServiceError,
    handlers::common::validate_input,
    services::catalog::{ProductDetail, ProductListing},
    services::reviews::SubmitReviewInput,
    ApiResponse, AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Response DTOs

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl From<category::Model> for CategoryResponse {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<product::Model> for ProductResponse {
    fn from(model: product::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            category_id: model.category_id,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<review::Model> for ReviewResponse {
    fn from(model: review::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            user_id: model.user_id,
            rating: model.rating,
            comment: model.comment,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductListResponse {
    pub products: Vec<ProductResponse>,
    pub categories: Vec<CategoryResponse>,
}

impl From<ProductListing> for ProductListResponse {
    fn from(listing: ProductListing) -> Self {
        Self {
            products: listing.products.into_iter().map(Into::into).collect(),
            categories: listing.categories.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDetailResponse {
    pub product: ProductResponse,
    pub reviews: Vec<ReviewResponse>,
}

impl From<ProductDetail> for ProductDetailResponse {
    fn from(detail: ProductDetail) -> Self {
        Self {
            product: detail.product.into(),
            reviews: detail.reviews.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub query: String,
    pub products: Vec<ProductResponse>,
}

// Request DTOs

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReviewRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(min = 1, message = "Comment must not be empty"))]
    pub comment: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Full product listing with categories for navigation
#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "Product listing", body = ApiResponse<ProductListResponse>),
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ProductListResponse>>, ServiceError> {
    let listing = state.services.catalog.list_products(None).await?;
    Ok(Json(ApiResponse::success(listing.into())))
}

/// Product listing narrowed to one category
#[utoipa::path(
    get,
    path = "/category/{slug}",
    params(("slug" = String, Path, description = "Category slug")),
    responses(
        (status = 200, description = "Product listing", body = ApiResponse<ProductListResponse>),
        (status = 404, description = "Unknown category", body = crate::errors::ErrorResponse),
    )
)]
pub async fn products_by_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<ProductListResponse>>, ServiceError> {
    let listing = state.services.catalog.list_products(Some(&slug)).await?;
    Ok(Json(ApiResponse::success(listing.into())))
}

/// Product detail with its reviews
#[utoipa::path(
    get,
    path = "/product/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product detail", body = ApiResponse<ProductDetailResponse>),
        (status = 404, description = "Unknown product", body = crate::errors::ErrorResponse),
    )
)]
pub async fn product_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ProductDetailResponse>>, ServiceError> {
    let detail = state.services.catalog.get_product(id).await?;
    Ok(Json(ApiResponse::success(detail.into())))
}

/// Submit a review for a product
#[utoipa::path(
    post,
    path = "/product/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = ReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ApiResponse<ReviewResponse>),
        (status = 400, description = "Invalid rating or comment", body = crate::errors::ErrorResponse),
        (status = 401, description = "Login required", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown product", body = crate::errors::ErrorResponse),
    )
)]
pub async fn submit_review(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReviewResponse>>), ServiceError> {
    validate_input(&payload)?;

    let review = state
        .services
        .reviews
        .submit(
            id,
            user.id,
            SubmitReviewInput {
                rating: payload.rating,
                comment: payload.comment,
            },
        )
        .await?;

    let mut response = ApiResponse::success(ReviewResponse::from(review));
    response.message = Some("Review submitted successfully!".to_string());
    Ok((StatusCode::CREATED, Json(response)))
}

/// Substring search over product name and description
#[utoipa::path(
    get,
    path = "/search",
    params(("q" = Option<String>, Query, description = "Search query")),
    responses(
        (status = 200, description = "Matching products", body = ApiResponse<SearchResponse>),
    )
)]
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchResponse>>, ServiceError> {
    let products = state.services.catalog.search(&query.q).await?;
    Ok(Json(ApiResponse::success(SearchResponse {
        query: query.q,
        products: products.into_iter().map(Into::into).collect(),
    })))
}
