use serde::Deserialize;
use serde_json::Value;
use std::fmt::Display;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::api::{ErrorCatalog, ErrorCode, PaginatedResponse};
use crate::config::{AppConfig, PaginationConfig, SearchConfig};
use crate::database::models::{
    Attribute, AttributeValue, Category, Department, NewReview, Product, ProductAttribute,
    ProductCategory, ProductDetail, Review, ReviewReceipt, ANONYMOUS_CUSTOMER_ID,
};
use crate::database::{CatalogStore, DatabaseError, Page};
use crate::filter::{MatchMode, PageQuery, Pagination, ParentFilter, ProductSearch};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{message}")]
    NotFound { code: ErrorCode, message: String },

    #[error("{message}")]
    BadRequest { code: ErrorCode, message: String },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl CatalogError {
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            CatalogError::NotFound { code, .. } | CatalogError::BadRequest { code, .. } => Some(*code),
            CatalogError::Database(_) => None,
        }
    }
}

/// Body of a review submission; `review` and `rating` are validated by the service
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewInput {
    pub product_id: i32,
    #[serde(default)]
    pub review: String,
    #[serde(default)]
    pub rating: Value,
}

/// Catalog read operations plus review creation, over any [`CatalogStore`]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    messages: ErrorCatalog,
    pagination: PaginationConfig,
    search: SearchConfig,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>, messages: ErrorCatalog, config: &AppConfig) -> Self {
        Self {
            store,
            messages,
            pagination: config.pagination.clone(),
            search: config.search.clone(),
        }
    }

    pub fn paginate(&self, query: &PageQuery) -> Pagination {
        Pagination::resolve(query, &self.pagination)
    }

    fn not_found(&self, code: ErrorCode, value: impl Display) -> CatalogError {
        let message = self.messages.message(code, value);
        debug!(code = code.as_str(), "{}", message);
        CatalogError::NotFound { code, message }
    }

    fn bad_request(&self, code: ErrorCode, value: impl Display) -> CatalogError {
        let message = self.messages.message(code, value);
        debug!(code = code.as_str(), "{}", message);
        CatalogError::BadRequest { code, message }
    }

    /// Parent-scoped listings with no rows are reported as not found
    fn require_rows<T>(&self, page: Page<T>, code: ErrorCode, parent: ParentFilter) -> Result<Page<T>, CatalogError> {
        if page.is_empty() {
            return Err(self.not_found(code, parent.id()));
        }
        Ok(page)
    }

    // Attributes

    pub async fn list_attributes(&self, query: &PageQuery) -> Result<Page<Attribute>, CatalogError> {
        Ok(self.store.list_attributes(&self.paginate(query)).await?)
    }

    pub async fn get_attribute(&self, attribute_id: i32) -> Result<Attribute, CatalogError> {
        self.store
            .find_attribute(attribute_id)
            .await?
            .ok_or_else(|| self.not_found(ErrorCode::Atr01, attribute_id))
    }

    pub async fn list_attribute_values(
        &self,
        attribute_id: i32,
        query: &PageQuery,
    ) -> Result<Page<AttributeValue>, CatalogError> {
        let page = self
            .store
            .list_attribute_values(attribute_id, &self.paginate(query))
            .await?;
        self.require_rows(page, ErrorCode::Atr01, ParentFilter::Attribute(attribute_id))
    }

    pub async fn list_product_attributes(
        &self,
        product_id: i32,
        query: &PageQuery,
    ) -> Result<Page<ProductAttribute>, CatalogError> {
        let page = self
            .store
            .list_product_attributes(product_id, &self.paginate(query))
            .await?;
        self.require_rows(page, ErrorCode::Atr02, ParentFilter::Product(product_id))
    }

    // Products

    pub async fn list_products(&self, query: &PageQuery) -> Result<PaginatedResponse<Product>, CatalogError> {
        let pagination = self.paginate(query);
        let page = self.store.list_products(&pagination).await?;
        Ok(PaginatedResponse::new(page, &pagination))
    }

    pub async fn search_products(
        &self,
        query_string: Option<&str>,
        all_words: Option<&str>,
        query: &PageQuery,
    ) -> Result<Vec<Product>, CatalogError> {
        let term = match query_string.map(str::trim) {
            Some(term) if !term.is_empty() => term,
            _ => return Err(self.not_found(ErrorCode::Usr10, "query_string")),
        };
        let search = ProductSearch::new(
            term,
            MatchMode::from_all_words(all_words),
            self.search.case_sensitive_name_match,
        );
        Ok(self.store.search_products(&search, &self.paginate(query)).await?)
    }

    pub async fn list_products_in_category(
        &self,
        category_id: i32,
        query: &PageQuery,
    ) -> Result<Page<Product>, CatalogError> {
        let page = self
            .store
            .list_products_in_category(category_id, &self.paginate(query))
            .await?;
        self.require_rows(page, ErrorCode::Prd02, ParentFilter::Category(category_id))
    }

    pub async fn list_products_in_department(
        &self,
        department_id: i32,
        query: &PageQuery,
    ) -> Result<Page<Product>, CatalogError> {
        let page = self
            .store
            .list_products_in_department(department_id, &self.paginate(query))
            .await?;
        self.require_rows(page, ErrorCode::Prd03, ParentFilter::Department(department_id))
    }

    pub async fn get_product(&self, product_id: i32) -> Result<ProductDetail, CatalogError> {
        let (product, attribute_values) = futures::try_join!(
            self.store.find_product(product_id),
            self.store.list_product_attribute_values(product_id),
        )?;
        let product = product.ok_or_else(|| self.not_found(ErrorCode::Prd01, product_id))?;
        Ok(ProductDetail { product, attribute_values })
    }

    // Reviews

    /// All reviews for the product (filtered by `product_id`, not a lookup of a review id)
    pub async fn get_product_reviews(&self, product_id: i32) -> Result<Vec<Review>, CatalogError> {
        if self.store.find_product(product_id).await?.is_none() {
            return Err(self.not_found(ErrorCode::Rev01, product_id));
        }
        Ok(self.store.list_reviews(product_id).await?)
    }

    pub async fn create_product_review(&self, input: ReviewInput) -> Result<ReviewReceipt, CatalogError> {
        let review = input.review.trim();
        if review.is_empty() {
            return Err(self.bad_request(ErrorCode::Rev03, ""));
        }
        let rating = match input.rating.as_i64().and_then(|r| i16::try_from(r).ok()) {
            Some(r) if (1..=5).contains(&r) => r,
            _ => return Err(self.bad_request(ErrorCode::Rev02, &input.rating)),
        };

        let receipt = self
            .store
            .create_review(NewReview {
                product_id: input.product_id,
                customer_id: ANONYMOUS_CUSTOMER_ID,
                review: review.to_string(),
                rating,
            })
            .await?
            .ok_or_else(|| self.not_found(ErrorCode::Prd01, input.product_id))?;

        info!("Review created for product {} ({})", input.product_id, receipt.name);
        Ok(receipt)
    }

    // Departments

    pub async fn list_departments(&self) -> Result<Vec<Department>, CatalogError> {
        Ok(self.store.list_departments().await?)
    }

    pub async fn get_department(&self, department_id: i32) -> Result<Department, CatalogError> {
        self.store
            .find_department(department_id)
            .await?
            .ok_or_else(|| self.not_found(ErrorCode::Dep02, department_id))
    }

    // Categories

    pub async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self.store.list_categories().await?)
    }

    pub async fn get_category(&self, category_id: i32) -> Result<Category, CatalogError> {
        self.store
            .find_category(category_id)
            .await?
            .ok_or_else(|| self.not_found(ErrorCode::Cat01, category_id))
    }

    pub async fn list_categories_in_department(
        &self,
        department_id: i32,
        query: &PageQuery,
    ) -> Result<Page<Category>, CatalogError> {
        let page = self
            .store
            .list_categories_in_department(department_id, &self.paginate(query))
            .await?;
        self.require_rows(page, ErrorCode::Dep02, ParentFilter::Department(department_id))
    }

    pub async fn get_categories_of_product(&self, product_id: i32) -> Result<Page<ProductCategory>, CatalogError> {
        let page = self.store.list_product_categories(product_id).await?;
        self.require_rows(page, ErrorCode::Cat02, ParentFilter::Product(product_id))
    }

    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        self.store.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixture_service, fixture_service_with, MemoryStore};
    use serde_json::json;

    fn page() -> PageQuery {
        PageQuery::default()
    }

    #[tokio::test]
    async fn attribute_values_are_scoped_to_their_attribute() {
        let service = fixture_service();
        let values = service.list_attribute_values(1, &page()).await.unwrap();
        assert!(!values.items.is_empty());
        assert!(values.items.iter().all(|v| v.attribute_id == 1));
        assert_eq!(values.total, values.items.len() as i64);
    }

    #[tokio::test]
    async fn attribute_without_values_is_atr_01() {
        let service = fixture_service();
        let err = service.list_attribute_values(999, &page()).await.unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::Atr01));
        assert!(err.to_string().contains("999"));
    }

    #[tokio::test]
    async fn product_attributes_missing_is_atr_02() {
        let service = fixture_service();
        let attrs = service.list_product_attributes(1, &page()).await.unwrap();
        assert_eq!(attrs.items.len(), 2);
        let err = service.list_product_attributes(3, &page()).await.unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::Atr02));
    }

    #[tokio::test]
    async fn all_fields_search_is_case_insensitive() {
        let service = fixture_service();
        let found = service.search_products(Some("SHOE"), Some("on"), &page()).await.unwrap();
        assert!(found.iter().any(|p| p.description.to_lowercase().contains("shoe")));
    }

    #[tokio::test]
    async fn name_only_search_honours_case_policy() {
        let insensitive = fixture_service();
        let found = insensitive.search_products(Some("shoe"), None, &page()).await.unwrap();
        assert_eq!(found.len(), 1);

        let mut config = AppConfig::development();
        config.search.case_sensitive_name_match = true;
        let sensitive = fixture_service_with(Arc::new(MemoryStore::fixture()), &config);
        assert!(sensitive.search_products(Some("shoe"), None, &page()).await.unwrap().is_empty());
        assert_eq!(sensitive.search_products(Some("Shoe"), None, &page()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn search_requires_query_string() {
        let service = fixture_service();
        for missing in [None, Some(""), Some("   ")] {
            let err = service.search_products(missing, None, &page()).await.unwrap_err();
            assert_eq!(err.code(), Some(ErrorCode::Usr10));
        }
    }

    #[tokio::test]
    async fn product_listing_computes_pagination_meta() {
        let store = Arc::new(MemoryStore::with_generated_products(45));
        let service = fixture_service_with(store, &AppConfig::development());
        let listing = service
            .list_products(&PageQuery { page: Some(3), limit: Some(20), offset: None })
            .await
            .unwrap();
        assert_eq!(listing.pagination_meta.total_records, 45);
        assert_eq!(listing.pagination_meta.current_page_size, 20);
        assert_eq!(listing.pagination_meta.total_pages, 3);
        assert_eq!(listing.pagination_meta.current_page, 3);
        assert_eq!(listing.rows.len(), 5);
    }

    #[tokio::test]
    async fn product_detail_nests_attribute_types() {
        let service = fixture_service();
        let detail = service.get_product(1).await.unwrap();
        assert_eq!(detail.product.name, "Canvas Shoe");
        assert_eq!(detail.attribute_values.len(), 2);
        assert!(detail.attribute_values.iter().any(|v| v.attribute_type.name == "Size"));

        let err = service.get_product(404).await.unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::Prd01));
    }

    #[tokio::test]
    async fn reviews_are_listed_by_product() {
        let service = fixture_service();
        let reviews = service.get_product_reviews(1).await.unwrap();
        assert_eq!(reviews.len(), 2);
        assert!(reviews.iter().all(|r| r.product_id == 1));
        // Newest first
        assert!(reviews[0].created_on >= reviews[1].created_on);

        // Existing product without reviews is an empty list, not an error
        assert!(service.get_product_reviews(2).await.unwrap().is_empty());

        let err = service.get_product_reviews(404).await.unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::Rev01));
    }

    #[tokio::test]
    async fn review_for_missing_product_writes_nothing() {
        let store = Arc::new(MemoryStore::fixture());
        let service = fixture_service_with(store.clone(), &AppConfig::development());
        let before = store.review_count();

        let err = service
            .create_product_review(ReviewInput { product_id: 404, review: "Great".into(), rating: json!(5) })
            .await
            .unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::Prd01));
        assert_eq!(store.review_count(), before);
    }

    #[tokio::test]
    async fn review_receipt_uses_store_timestamp() {
        let store = Arc::new(MemoryStore::fixture());
        let service = fixture_service_with(store.clone(), &AppConfig::development());

        let receipt = service
            .create_product_review(ReviewInput { product_id: 2, review: "  Fits well ".into(), rating: json!(4) })
            .await
            .unwrap();

        assert_eq!(receipt.name, "Wool Scarf");
        assert_eq!(receipt.review, "Fits well");
        assert_eq!(receipt.rating, 4);
        assert_eq!(receipt.created_on, MemoryStore::clock());
        let stored = store.reviews_for(2);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].customer_id, ANONYMOUS_CUSTOMER_ID);
    }

    #[tokio::test]
    async fn review_payload_is_validated() {
        let service = fixture_service();
        let err = service
            .create_product_review(ReviewInput { product_id: 1, review: "ok".into(), rating: json!(9) })
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::Rev02));

        for rating in [json!(4.5), json!("5"), Value::Null] {
            let err = service
                .create_product_review(ReviewInput { product_id: 1, review: "ok".into(), rating })
                .await
                .unwrap_err();
            assert_eq!(err.code(), Some(ErrorCode::Rev02));
        }

        let err = service
            .create_product_review(ReviewInput { product_id: 1, review: " ".into(), rating: json!(3) })
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::Rev03));
    }

    #[tokio::test]
    async fn unknown_department_is_dep_02() {
        let service = fixture_service();
        let err = service.get_department(77).await.unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::Dep02));
        assert_eq!(ErrorCode::Dep02.field(), "department_id");
        assert_eq!(service.get_department(1).await.unwrap().name, "Regional");
    }

    #[tokio::test]
    async fn category_lookups_map_to_their_codes() {
        let service = fixture_service();
        assert_eq!(service.get_category(1).await.unwrap().department_id, 1);
        assert_eq!(service.get_category(50).await.unwrap_err().code(), Some(ErrorCode::Cat01));

        let in_department = service.list_categories_in_department(1, &page()).await.unwrap();
        assert!(in_department.items.iter().all(|c| c.department_id == 1));
        assert_eq!(
            service.list_categories_in_department(50, &page()).await.unwrap_err().code(),
            Some(ErrorCode::Dep02)
        );

        let of_product = service.get_categories_of_product(1).await.unwrap();
        assert_eq!(of_product.total, 2);
        assert_eq!(
            service.get_categories_of_product(404).await.unwrap_err().code(),
            Some(ErrorCode::Cat02)
        );
    }

    #[tokio::test]
    async fn injected_messages_are_used() {
        let messages = ErrorCatalog::default().with_template(ErrorCode::Cat01, "no category {value}");
        let service = CatalogService::new(Arc::new(MemoryStore::fixture()), messages, &AppConfig::development());
        let err = service.get_category(9).await.unwrap_err();
        assert_eq!(err.to_string(), "no category 9");
    }

    #[tokio::test]
    async fn products_by_parent_map_to_their_codes() {
        let service = fixture_service();
        let in_category = service.list_products_in_category(1, &page()).await.unwrap();
        assert_eq!(in_category.total, 1);
        assert_eq!(
            service.list_products_in_category(50, &page()).await.unwrap_err().code(),
            Some(ErrorCode::Prd02)
        );

        // Product 1 is filed in two categories of department 1 but listed once
        let in_department = service.list_products_in_department(1, &page()).await.unwrap();
        assert_eq!(in_department.total, 2);
        assert_eq!(
            service.list_products_in_department(50, &page()).await.unwrap_err().code(),
            Some(ErrorCode::Prd03)
        );
    }
}
