//! In-memory catalog fixtures for service and router tests
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::api::ErrorCatalog;
use crate::config::AppConfig;
use crate::database::models::{
    Attribute, AttributeValue, Category, Department, NewReview, Product, ProductAttribute,
    ProductAttributeValue, ProductCategory, Review, ReviewReceipt,
};
use crate::database::{CatalogStore, DatabaseError, Page};
use crate::filter::{MatchMode, Pagination, ProductSearch};
use crate::server::AppState;
use crate::services::CatalogService;

/// Catalog held in vectors; mirrors the filtering the PostgreSQL store does in SQL
pub struct MemoryStore {
    attributes: Vec<Attribute>,
    attribute_values: Vec<AttributeValue>,
    departments: Vec<Department>,
    categories: Vec<Category>,
    products: Vec<Product>,
    // (product_id, attribute_value_id)
    product_attributes: Vec<(i32, i32)>,
    // (product_id, category_id)
    product_categories: Vec<(i32, i32)>,
    reviews: Mutex<Vec<Review>>,
}

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .and_then(|d| d.and_hms_opt(hour, 0, 0))
        .unwrap()
}

fn product(product_id: i32, name: &str, description: &str) -> Product {
    Product {
        product_id,
        name: name.to_string(),
        description: description.to_string(),
        price: Decimal::new(1999, 2),
        discounted_price: Decimal::new(0, 2),
        image: Some(format!("{}.gif", product_id)),
        image_2: None,
        thumbnail: Some(format!("{}-thumb.gif", product_id)),
        display: 0,
    }
}

fn window<T: Clone>(rows: &[T], pagination: &Pagination) -> Page<T> {
    let items = rows
        .iter()
        .skip(pagination.offset as usize)
        .take(pagination.limit as usize)
        .cloned()
        .collect();
    Page::new(items, rows.len() as i64)
}

impl MemoryStore {
    pub fn fixture() -> Self {
        let attribute = |attribute_id, name: &str| Attribute { attribute_id, name: name.to_string() };
        let value = |attribute_value_id, attribute_id, value: &str| AttributeValue {
            attribute_value_id,
            attribute_id,
            value: value.to_string(),
        };
        let category = |category_id, department_id, name: &str| Category {
            category_id,
            department_id,
            name: name.to_string(),
            description: None,
        };

        Self {
            attributes: vec![attribute(1, "Size"), attribute(2, "Color")],
            attribute_values: vec![
                value(1, 1, "S"),
                value(2, 1, "M"),
                value(3, 2, "White"),
                value(4, 2, "Red"),
            ],
            departments: vec![
                Department { department_id: 1, name: "Regional".into(), description: None },
                Department { department_id: 2, name: "Seasonal".into(), description: Some("Winter wear".into()) },
            ],
            categories: vec![category(1, 1, "Footwear"), category(2, 1, "Outdoor"), category(3, 2, "Accessories")],
            products: vec![
                product(1, "Canvas Shoe", "Lightweight canvas shoe for summer"),
                product(2, "Wool Scarf", "Soft scarf for cold days"),
                product(3, "Leather Boot", "A sturdy SHOE for hiking trails"),
            ],
            product_attributes: vec![(1, 1), (1, 3), (2, 4)],
            product_categories: vec![(1, 1), (1, 2), (3, 2), (2, 3)],
            reviews: Mutex::new(vec![
                Review {
                    review_id: 1,
                    customer_id: 1,
                    product_id: 1,
                    review: "Comfortable".into(),
                    rating: 4,
                    created_on: at(2, 10),
                },
                Review {
                    review_id: 2,
                    customer_id: 1,
                    product_id: 1,
                    review: "Wore out quickly".into(),
                    rating: 2,
                    created_on: at(5, 8),
                },
            ]),
        }
    }

    /// Fixture catalog whose product table holds `count` numbered products
    pub fn with_generated_products(count: i32) -> Self {
        let mut store = Self::fixture();
        store.products = (1..=count)
            .map(|id| product(id, &format!("Product {}", id), "Generated product"))
            .collect();
        store
    }

    /// Timestamp stamped on inserted reviews
    pub fn clock() -> NaiveDateTime {
        at(20, 12)
    }

    pub fn review_count(&self) -> usize {
        self.reviews.lock().unwrap().len()
    }

    pub fn reviews_for(&self, product_id: i32) -> Vec<Review> {
        self.reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect()
    }

    fn products_in(&self, category_ids: &[i32]) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| {
                self.product_categories
                    .iter()
                    .any(|(pid, cid)| *pid == p.product_id && category_ids.contains(cid))
            })
            .cloned()
            .collect()
    }

    fn matches(search: &ProductSearch, product: &Product) -> bool {
        let contains_ci = |haystack: &str| haystack.to_lowercase().contains(&search.term.to_lowercase());
        match search.mode {
            MatchMode::AllFields => contains_ci(&product.name) || contains_ci(&product.description),
            MatchMode::NameOnly if search.is_case_sensitive() => product.name.contains(&search.term),
            MatchMode::NameOnly => contains_ci(&product.name),
        }
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list_attributes(&self, pagination: &Pagination) -> Result<Page<Attribute>, DatabaseError> {
        Ok(window(&self.attributes, pagination))
    }

    async fn find_attribute(&self, attribute_id: i32) -> Result<Option<Attribute>, DatabaseError> {
        Ok(self.attributes.iter().find(|a| a.attribute_id == attribute_id).cloned())
    }

    async fn list_attribute_values(
        &self,
        attribute_id: i32,
        pagination: &Pagination,
    ) -> Result<Page<AttributeValue>, DatabaseError> {
        let rows: Vec<_> = self
            .attribute_values
            .iter()
            .filter(|v| v.attribute_id == attribute_id)
            .cloned()
            .collect();
        Ok(window(&rows, pagination))
    }

    async fn list_product_attributes(
        &self,
        product_id: i32,
        pagination: &Pagination,
    ) -> Result<Page<ProductAttribute>, DatabaseError> {
        let rows: Vec<_> = self
            .list_product_attribute_values(product_id)
            .await?
            .into_iter()
            .map(|v| ProductAttribute {
                attribute_name: v.attribute_type.name,
                attribute_value_id: v.attribute_value_id,
                attribute_value: v.value,
            })
            .collect();
        Ok(window(&rows, pagination))
    }

    async fn list_products(&self, pagination: &Pagination) -> Result<Page<Product>, DatabaseError> {
        Ok(window(&self.products, pagination))
    }

    async fn search_products(
        &self,
        search: &ProductSearch,
        pagination: &Pagination,
    ) -> Result<Vec<Product>, DatabaseError> {
        let rows: Vec<_> = self
            .products
            .iter()
            .filter(|p| Self::matches(search, p))
            .cloned()
            .collect();
        Ok(window(&rows, pagination).items)
    }

    async fn list_products_in_category(
        &self,
        category_id: i32,
        pagination: &Pagination,
    ) -> Result<Page<Product>, DatabaseError> {
        Ok(window(&self.products_in(&[category_id]), pagination))
    }

    async fn list_products_in_department(
        &self,
        department_id: i32,
        pagination: &Pagination,
    ) -> Result<Page<Product>, DatabaseError> {
        let category_ids: Vec<i32> = self
            .categories
            .iter()
            .filter(|c| c.department_id == department_id)
            .map(|c| c.category_id)
            .collect();
        Ok(window(&self.products_in(&category_ids), pagination))
    }

    async fn find_product(&self, product_id: i32) -> Result<Option<Product>, DatabaseError> {
        Ok(self.products.iter().find(|p| p.product_id == product_id).cloned())
    }

    async fn list_product_attribute_values(&self, product_id: i32) -> Result<Vec<ProductAttributeValue>, DatabaseError> {
        let mut rows: Vec<ProductAttributeValue> = self
            .product_attributes
            .iter()
            .filter(|(pid, _)| *pid == product_id)
            .filter_map(|(_, value_id)| self.attribute_values.iter().find(|v| v.attribute_value_id == *value_id))
            .filter_map(|value| {
                let attribute = self.attributes.iter().find(|a| a.attribute_id == value.attribute_id)?;
                Some(ProductAttributeValue {
                    attribute_value_id: value.attribute_value_id,
                    value: value.value.clone(),
                    attribute_type: attribute.clone(),
                })
            })
            .collect();
        rows.sort_by_key(|v| v.attribute_value_id);
        Ok(rows)
    }

    async fn list_reviews(&self, product_id: i32) -> Result<Vec<Review>, DatabaseError> {
        let mut rows = self.reviews_for(product_id);
        rows.sort_by(|a, b| b.created_on.cmp(&a.created_on));
        Ok(rows)
    }

    async fn create_review(&self, review: NewReview) -> Result<Option<ReviewReceipt>, DatabaseError> {
        let Some(product) = self.products.iter().find(|p| p.product_id == review.product_id) else {
            return Ok(None);
        };

        let mut reviews = self.reviews.lock().unwrap();
        let review_id = reviews.iter().map(|r| r.review_id).max().unwrap_or(0) + 1;
        reviews.push(Review {
            review_id,
            customer_id: review.customer_id,
            product_id: review.product_id,
            review: review.review.clone(),
            rating: review.rating,
            created_on: Self::clock(),
        });

        Ok(Some(ReviewReceipt {
            name: product.name.clone(),
            review: review.review,
            rating: review.rating,
            created_on: Self::clock(),
        }))
    }

    async fn list_departments(&self) -> Result<Vec<Department>, DatabaseError> {
        Ok(self.departments.clone())
    }

    async fn find_department(&self, department_id: i32) -> Result<Option<Department>, DatabaseError> {
        Ok(self.departments.iter().find(|d| d.department_id == department_id).cloned())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, DatabaseError> {
        Ok(self.categories.clone())
    }

    async fn find_category(&self, category_id: i32) -> Result<Option<Category>, DatabaseError> {
        Ok(self.categories.iter().find(|c| c.category_id == category_id).cloned())
    }

    async fn list_categories_in_department(
        &self,
        department_id: i32,
        pagination: &Pagination,
    ) -> Result<Page<Category>, DatabaseError> {
        let rows: Vec<_> = self
            .categories
            .iter()
            .filter(|c| c.department_id == department_id)
            .cloned()
            .collect();
        Ok(window(&rows, pagination))
    }

    async fn list_product_categories(&self, product_id: i32) -> Result<Page<ProductCategory>, DatabaseError> {
        let rows = self
            .categories
            .iter()
            .filter(|c| self.product_categories.contains(&(product_id, c.category_id)))
            .map(|c| ProductCategory {
                category_id: c.category_id,
                department_id: c.department_id,
                name: c.name.clone(),
            })
            .collect();
        Ok(Page::complete(rows))
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

pub fn fixture_service_with(store: Arc<MemoryStore>, config: &AppConfig) -> CatalogService {
    CatalogService::new(store, ErrorCatalog::default(), config)
}

pub fn fixture_service() -> CatalogService {
    fixture_service_with(Arc::new(MemoryStore::fixture()), &AppConfig::development())
}

pub fn fixture_state_with(store: Arc<MemoryStore>, config: &AppConfig) -> AppState {
    AppState::new(fixture_service_with(store, config))
}

pub fn fixture_state() -> AppState {
    fixture_state_with(Arc::new(MemoryStore::fixture()), &AppConfig::development())
}
