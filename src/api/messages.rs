use std::collections::HashMap;
use std::fmt::Display;

/// Stable error codes reported in the `error.code` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Attribute has no values (or does not exist)
    Atr01,
    /// Product has no attribute values (or does not exist)
    Atr02,
    Prd01,
    Prd02,
    Prd03,
    Rev01,
    Rev02,
    Rev03,
    Dep02,
    Cat01,
    Cat02,
    /// Required query parameter missing
    Usr10,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 12] = [
        ErrorCode::Atr01,
        ErrorCode::Atr02,
        ErrorCode::Prd01,
        ErrorCode::Prd02,
        ErrorCode::Prd03,
        ErrorCode::Rev01,
        ErrorCode::Rev02,
        ErrorCode::Rev03,
        ErrorCode::Dep02,
        ErrorCode::Cat01,
        ErrorCode::Cat02,
        ErrorCode::Usr10,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Atr01 => "ATR_01",
            ErrorCode::Atr02 => "ATR_02",
            ErrorCode::Prd01 => "PRD_01",
            ErrorCode::Prd02 => "PRD_02",
            ErrorCode::Prd03 => "PRD_03",
            ErrorCode::Rev01 => "REV_01",
            ErrorCode::Rev02 => "REV_02",
            ErrorCode::Rev03 => "REV_03",
            ErrorCode::Dep02 => "DEP_02",
            ErrorCode::Cat01 => "CAT_01",
            ErrorCode::Cat02 => "CAT_02",
            ErrorCode::Usr10 => "USR_10",
        }
    }

    /// Request field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            ErrorCode::Atr01 => "attribute_id",
            ErrorCode::Atr02 | ErrorCode::Prd01 | ErrorCode::Rev01 | ErrorCode::Cat02 => "product_id",
            ErrorCode::Prd02 | ErrorCode::Cat01 => "category_id",
            ErrorCode::Prd03 | ErrorCode::Dep02 => "department_id",
            ErrorCode::Rev02 => "rating",
            ErrorCode::Rev03 => "review",
            ErrorCode::Usr10 => "query_string",
        }
    }

    /// HTTP status. A missing search parameter is reported as 404 for compatibility with existing clients.
    pub fn status(&self) -> u16 {
        match self {
            ErrorCode::Rev02 | ErrorCode::Rev03 => 400,
            _ => 404,
        }
    }

    fn default_template(&self) -> &'static str {
        match self {
            ErrorCode::Atr01 => "No attribute values found for attribute_id {value}",
            ErrorCode::Atr02 => "No attributes found for product_id {value}",
            ErrorCode::Prd01 => "Product with product_id {value} does not exist",
            ErrorCode::Prd02 => "No products found in category_id {value}",
            ErrorCode::Prd03 => "No products found in department_id {value}",
            ErrorCode::Rev01 => "Cannot list reviews: product_id {value} does not exist",
            ErrorCode::Rev02 => "Rating must be between 1 and 5, got {value}",
            ErrorCode::Rev03 => "Review text must not be empty",
            ErrorCode::Dep02 => "Department with department_id {value} does not exist",
            ErrorCode::Cat01 => "Category with category_id {value} does not exist",
            ErrorCode::Cat02 => "No categories found for product_id {value}",
            ErrorCode::Usr10 => "The query_string parameter is required",
        }
    }
}

/// Message templates keyed by error code; `{value}` is replaced by the offending value
#[derive(Debug, Clone)]
pub struct ErrorCatalog {
    templates: HashMap<ErrorCode, String>,
}

impl Default for ErrorCatalog {
    fn default() -> Self {
        let templates = ErrorCode::ALL
            .iter()
            .map(|code| (*code, code.default_template().to_string()))
            .collect();
        Self { templates }
    }
}

impl ErrorCatalog {
    pub fn with_template(mut self, code: ErrorCode, template: impl Into<String>) -> Self {
        self.templates.insert(code, template.into());
        self
    }

    pub fn message(&self, code: ErrorCode, value: impl Display) -> String {
        match self.templates.get(&code) {
            Some(template) => template.replace("{value}", &value.to_string()),
            None => code.as_str().to_string(),
        }
    }
}
