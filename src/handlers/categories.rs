use axum::extract::State;

use crate::database::models::{Category, ProductCategory};
use crate::filter::PageQuery;
use crate::middleware::{ApiQuery, ApiResponse, ApiResult, PathId};
use crate::server::AppState;

/// GET /categories
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    let categories = state.catalog.list_categories().await?;
    Ok(ApiResponse::success(categories))
}

/// GET /categories/:category_id
pub async fn get(State(state): State<AppState>, PathId(category_id): PathId) -> ApiResult<Category> {
    let category = state.catalog.get_category(category_id).await?;
    Ok(ApiResponse::success(category))
}

/// GET /categories/inDepartment/:department_id
pub async fn in_department(
    State(state): State<AppState>,
    PathId(department_id): PathId,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Vec<Category>> {
    let page = state.catalog.list_categories_in_department(department_id, &query).await?;
    Ok(ApiResponse::success(page.items))
}

/// GET /categories/inProduct/:product_id - categories a product is filed under
pub async fn in_product(State(state): State<AppState>, PathId(product_id): PathId) -> ApiResult<Vec<ProductCategory>> {
    let page = state.catalog.get_categories_of_product(product_id).await?;
    Ok(ApiResponse::success(page.items))
}
