use axum::extract::State;

use crate::database::models::{Review, ReviewReceipt};
use crate::middleware::{ApiJson, ApiResponse, ApiResult, PathId};
use crate::server::AppState;
use crate::services::ReviewInput;

/// GET /products/:product_id/reviews - newest first
pub async fn list(State(state): State<AppState>, PathId(product_id): PathId) -> ApiResult<Vec<Review>> {
    let reviews = state.catalog.get_product_reviews(product_id).await?;
    Ok(ApiResponse::success(reviews))
}

/// POST /products/reviews - body `{ product_id, review, rating }`
pub async fn create(State(state): State<AppState>, ApiJson(input): ApiJson<ReviewInput>) -> ApiResult<ReviewReceipt> {
    let receipt = state.catalog.create_product_review(input).await?;
    Ok(ApiResponse::created(receipt))
}
