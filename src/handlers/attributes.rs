use axum::extract::State;

use crate::database::models::{Attribute, AttributeValue, ProductAttribute};
use crate::filter::PageQuery;
use crate::middleware::{ApiQuery, ApiResponse, ApiResult, PathId};
use crate::server::AppState;

/// GET /attributes - all attributes
pub async fn list(State(state): State<AppState>, ApiQuery(query): ApiQuery<PageQuery>) -> ApiResult<Vec<Attribute>> {
    let page = state.catalog.list_attributes(&query).await?;
    Ok(ApiResponse::success(page.items))
}

/// GET /attributes/:attribute_id - single attribute
pub async fn get(State(state): State<AppState>, PathId(attribute_id): PathId) -> ApiResult<Attribute> {
    let attribute = state.catalog.get_attribute(attribute_id).await?;
    Ok(ApiResponse::success(attribute))
}

/// GET /attributes/values/:attribute_id - values of one attribute
pub async fn values(
    State(state): State<AppState>,
    PathId(attribute_id): PathId,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Vec<AttributeValue>> {
    let page = state.catalog.list_attribute_values(attribute_id, &query).await?;
    Ok(ApiResponse::success(page.items))
}

/// GET /attributes/inProduct/:product_id - attribute values attached to a product
pub async fn in_product(
    State(state): State<AppState>,
    PathId(product_id): PathId,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Vec<ProductAttribute>> {
    let page = state.catalog.list_product_attributes(product_id, &query).await?;
    Ok(ApiResponse::success(page.items))
}
