use serde_json::Value;

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{is_valid_identifier, FilterData, FilterOrderInfo, Source, SqlParam, SqlResult};

pub struct Filter {
    source: Source,
    where_data: Option<Value>,
    order_data: Vec<FilterOrderInfo>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl Filter {
    pub fn new(source: Source) -> Result<Self, FilterError> {
        if let Source::Table(ref name) = source {
            Self::validate_table_name(name)?;
        }
        Ok(Self {
            source,
            where_data: None,
            order_data: vec![],
            limit: None,
            offset: None,
        })
    }

    pub fn assign(&mut self, data: FilterData) -> Result<&mut Self, FilterError> {
        if let Some(where_clause) = data.where_clause { self.where_clause(where_clause)?; }
        if let Some(order) = data.order { self.order(order)?; }
        if let Some(limit) = data.limit { self.limit(limit, data.offset)?; }
        Ok(self)
    }

    pub fn where_clause(&mut self, conditions: Value) -> Result<&mut Self, FilterError> {
        FilterWhere::validate(&conditions)?;
        self.where_data = Some(conditions);
        Ok(self)
    }

    pub fn order(&mut self, order_spec: Value) -> Result<&mut Self, FilterError> {
        self.order_data = FilterOrder::validate_and_parse(&order_spec)?;
        Ok(self)
    }

    pub fn limit(&mut self, limit: i64, offset: Option<i64>) -> Result<&mut Self, FilterError> {
        if limit < 0 { return Err(FilterError::InvalidLimit("Limit must be non-negative".to_string())); }
        if let Some(off) = offset { if off < 0 { return Err(FilterError::InvalidOffset("Offset must be non-negative".to_string())); } }
        self.limit = Some(limit);
        self.offset = offset;
        Ok(self)
    }

    pub fn to_sql(&self) -> Result<SqlResult, FilterError> {
        let (where_clause, params) = self.where_sql()?;
        let order_clause = FilterOrder::generate(&self.order_data)?;
        let limit_clause = self.build_limit_clause();

        let query = [
            format!("SELECT {}", self.select_clause()),
            format!("FROM {}", self.from_clause()),
            format!("WHERE {}", where_clause),
            order_clause,
            limit_clause,
        ].into_iter().filter(|s| !s.is_empty()).collect::<Vec<_>>().join(" ");

        Ok(SqlResult { query, params })
    }

    pub fn to_count_sql(&self) -> Result<SqlResult, FilterError> {
        let (where_clause, params) = self.where_sql()?;
        let count = match &self.source {
            Source::Table(_) => "COUNT(*)",
            Source::Join { count, .. } => *count,
        };
        let query = format!(
            "SELECT {} as count FROM {} WHERE {}",
            count,
            self.from_clause(),
            where_clause
        );
        Ok(SqlResult { query, params })
    }

    fn where_sql(&self) -> Result<(String, Vec<SqlParam>), FilterError> {
        match self.where_data {
            Some(ref where_data) => FilterWhere::generate(where_data, 0),
            None => Ok(("1=1".to_string(), vec![])),
        }
    }

    fn validate_table_name(name: &str) -> Result<(), FilterError> {
        if name.is_empty() { return Err(FilterError::InvalidTableName("Table name cannot be empty".to_string())); }
        if !is_valid_identifier(name) {
            return Err(FilterError::InvalidTableName(format!("Invalid table name format: {}", name)));
        }
        Ok(())
    }

    fn select_clause(&self) -> &str {
        match &self.source {
            Source::Table(_) => "*",
            Source::Join { select, .. } => *select,
        }
    }

    fn from_clause(&self) -> String {
        match &self.source {
            Source::Table(name) => format!("\"{}\"", name),
            Source::Join { from, .. } => from.to_string(),
        }
    }

    fn build_limit_clause(&self) -> String {
        match (self.limit, self.offset) {
            (Some(l), Some(o)) => format!("LIMIT {} OFFSET {}", l, o),
            (Some(l), None) => format!("LIMIT {}", l),
            _ => String::new(),
        }
    }
}
