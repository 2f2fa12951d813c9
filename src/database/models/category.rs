use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub category_id: i32,
    pub department_id: i32,
    pub name: String,
    pub description: Option<String>,
}

/// Category a product is filed under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProductCategory {
    pub category_id: i32,
    pub department_id: i32,
    pub name: String,
}
