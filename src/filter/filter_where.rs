use serde_json::Value;

use super::error::FilterError;
use super::types::{quote_identifier, FilterOp, FilterWhereInfo, SqlParam};

/// Compiles a JSON WHERE descriptor into SQL with numbered bind parameters.
///
/// `{ "name": "Shoe" }` is implicit equality, `{ "name": { "$ilike": "%shoe%" } }` uses an
/// explicit operator, and `$and` / `$or` nest sub-descriptors.
pub struct FilterWhere {
    param_values: Vec<SqlParam>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    pub fn generate(where_data: &Value, starting_param_index: usize) -> Result<(String, Vec<SqlParam>), FilterError> {
        let mut filter_where = Self::new(starting_param_index);
        let clause = filter_where.build_clause(where_data)?;
        Ok((clause, filter_where.param_values))
    }

    pub fn validate(where_data: &Value) -> Result<(), FilterError> {
        match where_data {
            Value::Null | Value::Object(_) => Ok(()),
            _ => Err(FilterError::InvalidWhereClause("WHERE must be an object".to_string())),
        }
    }

    fn build_clause(&mut self, where_data: &Value) -> Result<String, FilterError> {
        let obj = match where_data {
            Value::Null => return Ok("1=1".to_string()),
            Value::Object(obj) => obj,
            _ => return Err(FilterError::InvalidWhereClause("Unsupported WHERE format".to_string())),
        };

        let mut sql_conditions = vec![];
        for (key, value) in obj {
            if key.starts_with('$') {
                sql_conditions.push(self.build_logical(key, value)?);
            } else {
                for condition in Self::parse_field_condition(key, value)? {
                    sql_conditions.push(self.build_sql_condition(&condition)?);
                }
            }
        }

        if sql_conditions.is_empty() {
            Ok("1=1".to_string())
        } else {
            Ok(sql_conditions.join(" AND "))
        }
    }

    fn build_logical(&mut self, op: &str, value: &Value) -> Result<String, FilterError> {
        match op {
            "$and" | "$or" => {
                let arr = value
                    .as_array()
                    .ok_or_else(|| FilterError::InvalidOperatorData(format!("{} requires array", op)))?;
                if arr.is_empty() {
                    return Ok(if op == "$and" { "1=1" } else { "1=0" }.to_string());
                }
                let mut sql_parts = Vec::with_capacity(arr.len());
                for v in arr {
                    sql_parts.push(format!("({})", self.build_clause(v)?));
                }
                let joiner = if op == "$and" { " AND " } else { " OR " };
                Ok(format!("({})", sql_parts.join(joiner)))
            }
            _ => Err(FilterError::UnsupportedOperator(op.to_string())),
        }
    }

    fn parse_field_condition(field: &str, value: &Value) -> Result<Vec<FilterWhereInfo>, FilterError> {
        if let Value::Object(obj) = value {
            obj.iter()
                .map(|(op_key, op_val)| {
                    Ok(FilterWhereInfo {
                        column: field.to_string(),
                        operator: Self::map_operator(op_key)?,
                        data: op_val.clone(),
                    })
                })
                .collect()
        } else {
            Ok(vec![FilterWhereInfo {
                column: field.to_string(),
                operator: FilterOp::Eq,
                data: value.clone(),
            }])
        }
    }

    fn map_operator(op_key: &str) -> Result<FilterOp, FilterError> {
        Ok(match op_key {
            "$eq" => FilterOp::Eq,
            "$like" => FilterOp::Like,
            "$ilike" => FilterOp::ILike,
            other => return Err(FilterError::UnsupportedOperator(other.to_string())),
        })
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> Result<String, FilterError> {
        let column = quote_identifier(&condition.column)?;
        let data = &condition.data;
        let sql = match condition.operator {
            FilterOp::Eq if data.is_null() => format!("{} IS NULL", column),
            FilterOp::Eq => format!("{} = {}", column, self.param(data)?),
            FilterOp::Like => format!("{} LIKE {}", column, self.param(data)?),
            FilterOp::ILike => format!("{} ILIKE {}", column, self.param(data)?),
        };
        Ok(sql)
    }

    fn param(&mut self, value: &Value) -> Result<String, FilterError> {
        self.param_values.push(SqlParam::try_from(value)?);
        self.param_index += 1;
        Ok(format!("${}", self.param_index))
    }
}
