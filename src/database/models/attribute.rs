use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Attribute {
    pub attribute_id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AttributeValue {
    pub attribute_value_id: i32,
    pub attribute_id: i32,
    pub value: String,
}

/// An attribute value attached to a product, labelled with its attribute name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProductAttribute {
    pub attribute_name: String,
    pub attribute_value_id: i32,
    pub attribute_value: String,
}
