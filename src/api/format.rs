use serde::Serialize;

use crate::database::Page;
use crate::filter::Pagination;

/// Metadata block of the paginated envelope, computed from the request and result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: i64,
    pub current_page_size: i64,
    pub total_pages: i64,
    pub total_records: i64,
}

impl PaginationMeta {
    pub fn new(pagination: &Pagination, total_records: i64) -> Self {
        Self {
            current_page: pagination.page,
            current_page_size: pagination.limit,
            total_pages: pagination.total_pages(total_records),
            total_records,
        }
    }
}

/// `{ paginationMeta: {...}, rows: [...] }`
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    #[serde(rename = "paginationMeta")]
    pub pagination_meta: PaginationMeta,
    pub rows: Vec<T>,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn new(page: Page<T>, pagination: &Pagination) -> Self {
        Self {
            pagination_meta: PaginationMeta::new(pagination, page.total),
            rows: page.items,
        }
    }
}
