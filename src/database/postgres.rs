use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::time::Instant;
use tracing::debug;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{
    Attribute, AttributeValue, Category, Department, NewReview, Product, ProductAttribute,
    ProductAttributeValue, ProductAttributeValueRow, ProductCategory, Review, ReviewReceipt,
};
use crate::database::repository::{Page, Repository};
use crate::database::store::CatalogStore;
use crate::filter::{FilterData, Pagination, ParentFilter, ProductSearch, Source};

const ATTRIBUTE_VALUE_JOIN: &str = "attribute_value av \
     JOIN attribute a ON a.attribute_id = av.attribute_id \
     JOIN product_attribute pa ON pa.attribute_value_id = av.attribute_value_id";

const PRODUCT_ATTRIBUTES: Source = Source::Join {
    select: "a.name AS attribute_name, av.attribute_value_id, av.value AS attribute_value",
    from: ATTRIBUTE_VALUE_JOIN,
    count: "COUNT(*)",
};

const PRODUCT_ATTRIBUTE_VALUES: Source = Source::Join {
    select: "av.attribute_value_id, av.value, a.attribute_id, a.name AS attribute_name",
    from: ATTRIBUTE_VALUE_JOIN,
    count: "COUNT(*)",
};

const PRODUCTS_IN_CATEGORY: Source = Source::Join {
    select: "p.*",
    from: "product p JOIN product_category pc ON pc.product_id = p.product_id",
    count: "COUNT(*)",
};

// A product filed under several categories of one department appears once
const PRODUCTS_IN_DEPARTMENT: Source = Source::Join {
    select: "DISTINCT p.*",
    from: "product p \
         JOIN product_category pc ON pc.product_id = p.product_id \
         JOIN category c ON c.category_id = pc.category_id",
    count: "COUNT(DISTINCT p.product_id)",
};

const PRODUCT_CATEGORIES: Source = Source::Join {
    select: "c.category_id, c.department_id, c.name",
    from: "category c JOIN product_category pc ON pc.category_id = c.category_id",
    count: "COUNT(*)",
};

/// [`CatalogStore`] over the PostgreSQL catalog schema
#[derive(Clone)]
pub struct PgCatalogStore {
    db: DatabaseManager,
}

impl PgCatalogStore {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }

    fn table<T>(&self, name: &str) -> Repository<T>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        Repository::new(name, &self.db)
    }

    fn join<T>(&self, source: Source) -> Repository<T>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        Repository::joined(source, &self.db)
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn list_attributes(&self, pagination: &Pagination) -> Result<Page<Attribute>, DatabaseError> {
        self.table("attribute")
            .select_page(FilterData::default().order_by("attribute_id"), pagination)
            .await
    }

    async fn find_attribute(&self, attribute_id: i32) -> Result<Option<Attribute>, DatabaseError> {
        self.table("attribute")
            .select_one(FilterData::eq("attribute_id", attribute_id))
            .await
    }

    async fn list_attribute_values(
        &self,
        attribute_id: i32,
        pagination: &Pagination,
    ) -> Result<Page<AttributeValue>, DatabaseError> {
        let filter = FilterData::default()
            .with_where(ParentFilter::Attribute(attribute_id).where_clause(None))
            .order_by("attribute_value_id");
        self.table("attribute_value").select_page(filter, pagination).await
    }

    async fn list_product_attributes(
        &self,
        product_id: i32,
        pagination: &Pagination,
    ) -> Result<Page<ProductAttribute>, DatabaseError> {
        let filter = FilterData::default()
            .with_where(ParentFilter::Product(product_id).where_clause(Some("pa")))
            .order_by("av.attribute_value_id");
        self.join(PRODUCT_ATTRIBUTES).select_page(filter, pagination).await
    }

    async fn list_products(&self, pagination: &Pagination) -> Result<Page<Product>, DatabaseError> {
        self.table("product")
            .select_page(FilterData::default().order_by("product_id"), pagination)
            .await
    }

    async fn search_products(
        &self,
        search: &ProductSearch,
        pagination: &Pagination,
    ) -> Result<Vec<Product>, DatabaseError> {
        debug!("Searching products for {:?} ({:?})", search.term, search.mode);
        self.table("product")
            .select_any(search.to_filter().paged(pagination))
            .await
    }

    async fn list_products_in_category(
        &self,
        category_id: i32,
        pagination: &Pagination,
    ) -> Result<Page<Product>, DatabaseError> {
        let filter = FilterData::default()
            .with_where(ParentFilter::Category(category_id).where_clause(Some("pc")))
            .order_by("p.product_id");
        self.join(PRODUCTS_IN_CATEGORY).select_page(filter, pagination).await
    }

    async fn list_products_in_department(
        &self,
        department_id: i32,
        pagination: &Pagination,
    ) -> Result<Page<Product>, DatabaseError> {
        let filter = FilterData::default()
            .with_where(ParentFilter::Department(department_id).where_clause(Some("c")))
            .order_by("p.product_id");
        self.join(PRODUCTS_IN_DEPARTMENT).select_page(filter, pagination).await
    }

    async fn find_product(&self, product_id: i32) -> Result<Option<Product>, DatabaseError> {
        self.table("product")
            .select_one(FilterData::eq("product_id", product_id))
            .await
    }

    async fn list_product_attribute_values(&self, product_id: i32) -> Result<Vec<ProductAttributeValue>, DatabaseError> {
        let filter = FilterData::default()
            .with_where(ParentFilter::Product(product_id).where_clause(Some("pa")))
            .order_by("a.attribute_id, av.attribute_value_id");
        let rows: Vec<ProductAttributeValueRow> = self.join(PRODUCT_ATTRIBUTE_VALUES).select_any(filter).await?;
        Ok(rows.into_iter().map(ProductAttributeValue::from).collect())
    }

    async fn list_reviews(&self, product_id: i32) -> Result<Vec<Review>, DatabaseError> {
        let filter = FilterData::default()
            .with_where(ParentFilter::Product(product_id).where_clause(None))
            .order_by("created_on desc, review_id desc");
        self.table("review").select_any(filter).await
    }

    async fn create_review(&self, review: NewReview) -> Result<Option<ReviewReceipt>, DatabaseError> {
        let started = Instant::now();
        let mut tx = self.db.pool().begin().await?;

        // Lock the product row so it cannot be deleted between check and insert
        let name: Option<String> =
            sqlx::query_scalar("SELECT name FROM product WHERE product_id = $1 FOR KEY SHARE")
                .bind(review.product_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(name) = name else {
            tx.rollback().await?;
            return Ok(None);
        };

        let (text, rating, created_on): (String, i16, NaiveDateTime) = sqlx::query_as(
            "INSERT INTO review (customer_id, product_id, review, rating, created_on) \
             VALUES ($1, $2, $3, $4, NOW()) \
             RETURNING review, rating, created_on",
        )
        .bind(review.customer_id)
        .bind(review.product_id)
        .bind(&review.review)
        .bind(review.rating)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        self.db.observe_duration("create_review", started);

        Ok(Some(ReviewReceipt {
            name,
            review: text,
            rating,
            created_on,
        }))
    }

    async fn list_departments(&self) -> Result<Vec<Department>, DatabaseError> {
        self.table("department")
            .select_any(FilterData::default().order_by("department_id"))
            .await
    }

    async fn find_department(&self, department_id: i32) -> Result<Option<Department>, DatabaseError> {
        self.table("department")
            .select_one(FilterData::eq("department_id", department_id))
            .await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, DatabaseError> {
        self.table("category")
            .select_any(FilterData::default().order_by("category_id"))
            .await
    }

    async fn find_category(&self, category_id: i32) -> Result<Option<Category>, DatabaseError> {
        self.table("category")
            .select_one(FilterData::eq("category_id", category_id))
            .await
    }

    async fn list_categories_in_department(
        &self,
        department_id: i32,
        pagination: &Pagination,
    ) -> Result<Page<Category>, DatabaseError> {
        let filter = FilterData::default()
            .with_where(ParentFilter::Department(department_id).where_clause(None))
            .order_by("category_id");
        self.table("category").select_page(filter, pagination).await
    }

    async fn list_product_categories(&self, product_id: i32) -> Result<Page<ProductCategory>, DatabaseError> {
        let filter = FilterData::default()
            .with_where(ParentFilter::Product(product_id).where_clause(Some("pc")))
            .order_by("c.category_id");
        let categories = self.join(PRODUCT_CATEGORIES).select_any(filter).await?;
        Ok(Page::complete(categories))
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.db.health_check().await
    }
}
