use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Attribute, AttributeValue, Category, Department, NewReview, Product, ProductAttribute,
    ProductAttributeValue, ProductCategory, Review, ReviewReceipt,
};
use crate::database::repository::Page;
use crate::filter::{Pagination, ProductSearch};

/// Record store behind the catalog service.
///
/// Reads never fail for a missing id: lookups return `None` and listings
/// return an empty page, leaving the not-found decision to the caller.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_attributes(&self, pagination: &Pagination) -> Result<Page<Attribute>, DatabaseError>;

    async fn find_attribute(&self, attribute_id: i32) -> Result<Option<Attribute>, DatabaseError>;

    async fn list_attribute_values(
        &self,
        attribute_id: i32,
        pagination: &Pagination,
    ) -> Result<Page<AttributeValue>, DatabaseError>;

    async fn list_product_attributes(
        &self,
        product_id: i32,
        pagination: &Pagination,
    ) -> Result<Page<ProductAttribute>, DatabaseError>;

    async fn list_products(&self, pagination: &Pagination) -> Result<Page<Product>, DatabaseError>;

    async fn search_products(
        &self,
        search: &ProductSearch,
        pagination: &Pagination,
    ) -> Result<Vec<Product>, DatabaseError>;

    async fn list_products_in_category(
        &self,
        category_id: i32,
        pagination: &Pagination,
    ) -> Result<Page<Product>, DatabaseError>;

    async fn list_products_in_department(
        &self,
        department_id: i32,
        pagination: &Pagination,
    ) -> Result<Page<Product>, DatabaseError>;

    async fn find_product(&self, product_id: i32) -> Result<Option<Product>, DatabaseError>;

    async fn list_product_attribute_values(&self, product_id: i32) -> Result<Vec<ProductAttributeValue>, DatabaseError>;

    /// All reviews of a product, newest first
    async fn list_reviews(&self, product_id: i32) -> Result<Vec<Review>, DatabaseError>;

    /// Insert a review if its product exists, atomically with the existence check.
    /// Returns `None` (and writes nothing) when the product is missing.
    async fn create_review(&self, review: NewReview) -> Result<Option<ReviewReceipt>, DatabaseError>;

    async fn list_departments(&self) -> Result<Vec<Department>, DatabaseError>;

    async fn find_department(&self, department_id: i32) -> Result<Option<Department>, DatabaseError>;

    async fn list_categories(&self) -> Result<Vec<Category>, DatabaseError>;

    async fn find_category(&self, category_id: i32) -> Result<Option<Category>, DatabaseError>;

    async fn list_categories_in_department(
        &self,
        department_id: i32,
        pagination: &Pagination,
    ) -> Result<Page<Category>, DatabaseError>;

    async fn list_product_categories(&self, product_id: i32) -> Result<Page<ProductCategory>, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}
