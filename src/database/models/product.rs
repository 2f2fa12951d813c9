use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::attribute::Attribute;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub product_id: i32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub discounted_price: Decimal,
    pub image: Option<String>,
    pub image_2: Option<String>,
    pub thumbnail: Option<String>,
    pub display: i16,
}

/// Product with its attribute values and each value's attribute type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub attribute_values: Vec<ProductAttributeValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductAttributeValue {
    pub attribute_value_id: i32,
    pub value: String,
    pub attribute_type: Attribute,
}

/// Flat join row behind [`ProductAttributeValue`]
#[derive(Debug, Clone, FromRow)]
pub struct ProductAttributeValueRow {
    pub attribute_value_id: i32,
    pub value: String,
    pub attribute_id: i32,
    pub attribute_name: String,
}

impl From<ProductAttributeValueRow> for ProductAttributeValue {
    fn from(row: ProductAttributeValueRow) -> Self {
        Self {
            attribute_value_id: row.attribute_value_id,
            value: row.value,
            attribute_type: Attribute {
                attribute_id: row.attribute_id,
                name: row.attribute_name,
            },
        }
    }
}
