use axum::extract::State;
use serde::Deserialize;

use crate::api::PaginatedResponse;
use crate::database::models::{Product, ProductDetail};
use crate::filter::PageQuery;
use crate::middleware::{ApiQuery, ApiResponse, ApiResult, PathId};
use crate::server::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub query_string: Option<String>,
    /// `on` searches name and description; otherwise name only
    pub all_words: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl SearchQuery {
    fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
            offset: self.offset,
        }
    }
}

/// GET /products - paginated listing with `paginationMeta`
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<PaginatedResponse<Product>> {
    let listing = state.catalog.list_products(&query).await?;
    Ok(ApiResponse::success(listing))
}

/// GET /products/search?query_string=...&all_words=on
pub async fn search(State(state): State<AppState>, ApiQuery(query): ApiQuery<SearchQuery>) -> ApiResult<Vec<Product>> {
    let products = state
        .catalog
        .search_products(
            query.query_string.as_deref(),
            query.all_words.as_deref(),
            &query.page_query(),
        )
        .await?;
    Ok(ApiResponse::success(products))
}

/// GET /products/inCategory/:category_id
pub async fn in_category(
    State(state): State<AppState>,
    PathId(category_id): PathId,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Vec<Product>> {
    let page = state.catalog.list_products_in_category(category_id, &query).await?;
    Ok(ApiResponse::success(page.items))
}

/// GET /products/inDepartment/:department_id
pub async fn in_department(
    State(state): State<AppState>,
    PathId(department_id): PathId,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Vec<Product>> {
    let page = state.catalog.list_products_in_department(department_id, &query).await?;
    Ok(ApiResponse::success(page.items))
}

/// GET /products/:product_id - product with attribute values
pub async fn get(State(state): State<AppState>, PathId(product_id): PathId) -> ApiResult<ProductDetail> {
    let detail = state.catalog.get_product(product_id).await?;
    Ok(ApiResponse::success(detail))
}
