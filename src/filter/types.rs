use serde_json::Value;

use super::error::FilterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Like,
    ILike,
}

/// Scalar value bound to a `$n` placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl TryFrom<&Value> for SqlParam {
    type Error = FilterError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(b) => Ok(SqlParam::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(SqlParam::Int)
                .or_else(|| n.as_f64().map(SqlParam::Float))
                .ok_or_else(|| FilterError::InvalidOperatorData(format!("Unsupported number: {}", n))),
            Value::String(s) => Ok(SqlParam::Text(s.clone())),
            other => Err(FilterError::InvalidOperatorData(format!(
                "Expected a scalar value, got {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterData {
    pub where_clause: Option<Value>,
    pub order: Option<Value>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl FilterData {
    /// Equality filter on a single column
    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        let mut where_clause = serde_json::Map::new();
        where_clause.insert(column.to_string(), value.into());
        Self {
            where_clause: Some(Value::Object(where_clause)),
            ..Default::default()
        }
    }

    pub fn with_where(mut self, where_clause: Value) -> Self {
        self.where_clause = Some(where_clause);
        self
    }

    pub fn order_by(mut self, order: impl Into<Value>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn paged(mut self, pagination: &super::Pagination) -> Self {
        self.limit = Some(pagination.limit);
        self.offset = Some(pagination.offset);
        self
    }
}

/// Where rows come from: a single table, or a fixed join declared by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Table(String),
    Join {
        select: &'static str,
        from: &'static str,
        count: &'static str,
    },
}

#[derive(Debug, Clone)]
pub struct FilterWhereInfo {
    pub column: String,
    pub operator: FilterOp,
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterOrderInfo {
    pub column: String,
    pub sort: SortDirection,
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}

/// Quote a (possibly table-qualified) identifier: `pc.category_id` -> `"pc"."category_id"`
pub fn quote_identifier(name: &str) -> Result<String, FilterError> {
    if name.is_empty() {
        return Err(FilterError::InvalidColumn("Column name cannot be empty".to_string()));
    }
    let mut parts = Vec::new();
    for part in name.split('.') {
        if !is_valid_identifier(part) {
            return Err(FilterError::InvalidColumn(format!("Invalid column name format: {}", name)));
        }
        parts.push(format!("\"{}\"", part));
    }
    Ok(parts.join("."))
}

pub(crate) fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_qualified_identifiers() {
        assert_eq!(quote_identifier("name").unwrap(), "\"name\"");
        assert_eq!(quote_identifier("pc.category_id").unwrap(), "\"pc\".\"category_id\"");
    }

    #[test]
    fn rejects_injection_in_identifiers() {
        assert!(quote_identifier("name; DROP TABLE product").is_err());
        assert!(quote_identifier("pc.").is_err());
        assert!(quote_identifier("1abc").is_err());
    }
}
