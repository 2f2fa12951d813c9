use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::PaginationConfig;

/// Raw pagination parameters as they arrive on the query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Resolved pagination window. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    /// Resolve raw parameters against the configured defaults.
    ///
    /// An explicit `offset` wins over `page`; the page number is then derived
    /// from it so the response metadata stays consistent with the rows returned.
    pub fn resolve(query: &PageQuery, config: &PaginationConfig) -> Self {
        let config = config.normalized();
        let limit = match query.limit {
            Some(l) if l > config.max_limit => {
                tracing::warn!("Limit {} exceeds max {}, capping to max", l, config.max_limit);
                config.max_limit
            }
            Some(l) if l > 0 => l,
            _ => config.default_limit,
        };

        match (query.offset, query.page) {
            (Some(offset), _) if offset >= 0 => Self {
                page: offset / limit + 1,
                limit,
                offset,
            },
            (_, page) => {
                let page = page.filter(|p| *p >= 1).unwrap_or(1);
                Self {
                    page,
                    limit,
                    offset: (page - 1).saturating_mul(limit),
                }
            }
        }
    }

    pub fn first_page(limit: i64) -> Self {
        Self { page: 1, limit, offset: 0 }
    }

    /// Number of pages needed for `total` records at this page size
    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 || self.limit <= 0 {
            return 0;
        }
        (total + self.limit - 1) / self.limit
    }
}

/// Equality filter on the foreign key that scopes a listing to its parent entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentFilter {
    Attribute(i32),
    Product(i32),
    Category(i32),
    Department(i32),
}

impl ParentFilter {
    pub fn id(&self) -> i32 {
        match *self {
            ParentFilter::Attribute(id)
            | ParentFilter::Product(id)
            | ParentFilter::Category(id)
            | ParentFilter::Department(id) => id,
        }
    }

    /// Foreign-key column name; also the request field reported in errors
    pub fn column(&self) -> &'static str {
        match self {
            ParentFilter::Attribute(_) => "attribute_id",
            ParentFilter::Product(_) => "product_id",
            ParentFilter::Category(_) => "category_id",
            ParentFilter::Department(_) => "department_id",
        }
    }

    /// WHERE descriptor against the column as seen through `alias`
    pub fn where_clause(&self, alias: Option<&str>) -> Value {
        let column = match alias {
            Some(alias) => format!("{}.{}", alias, self.column()),
            None => self.column().to_string(),
        };
        json!({ column: self.id() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PaginationConfig {
        PaginationConfig { default_limit: 20, max_limit: 100 }
    }

    fn query(page: Option<i64>, limit: Option<i64>, offset: Option<i64>) -> PageQuery {
        PageQuery { page, limit, offset }
    }

    #[test]
    fn defaults_apply_when_nothing_given() {
        let p = Pagination::resolve(&PageQuery::default(), &config());
        assert_eq!(p, Pagination { page: 1, limit: 20, offset: 0 });
    }

    #[test]
    fn page_derives_offset() {
        let p = Pagination::resolve(&query(Some(3), Some(10), None), &config());
        assert_eq!(p, Pagination { page: 3, limit: 10, offset: 20 });
    }

    #[test]
    fn offset_wins_and_derives_page() {
        let p = Pagination::resolve(&query(Some(9), Some(10), Some(25)), &config());
        assert_eq!(p, Pagination { page: 3, limit: 10, offset: 25 });
    }

    #[test]
    fn invalid_values_fall_back() {
        let p = Pagination::resolve(&query(Some(0), Some(-4), Some(-1)), &config());
        assert_eq!(p, Pagination { page: 1, limit: 20, offset: 0 });
    }

    #[test]
    fn limit_is_capped() {
        let p = Pagination::resolve(&query(None, Some(5000), None), &config());
        assert_eq!(p.limit, 100);
    }

    #[test]
    fn zero_limits_in_config_do_not_divide_by_zero() {
        let zero_default = PaginationConfig { default_limit: 0, max_limit: 100 };
        let p = Pagination::resolve(&query(None, None, Some(10)), &zero_default);
        assert_eq!((p.limit, p.offset, p.page), (1, 10, 11));

        let zero_max = PaginationConfig { default_limit: 20, max_limit: 0 };
        let p = Pagination::resolve(&query(None, Some(5), Some(10)), &zero_max);
        assert_eq!((p.limit, p.offset, p.page), (1, 10, 11));
    }

    #[test]
    fn default_above_max_is_capped() {
        let inverted = PaginationConfig { default_limit: 50, max_limit: 10 };
        let p = Pagination::resolve(&PageQuery::default(), &inverted);
        assert_eq!(p.limit, 10);
    }

    #[test]
    fn total_pages_is_computed_not_constant() {
        let p = Pagination::first_page(20);
        assert_eq!(p.total_pages(45), 3);
        assert_eq!(p.total_pages(40), 2);
        assert_eq!(p.total_pages(1), 1);
        assert_eq!(p.total_pages(0), 0);
    }

    #[test]
    fn parent_filter_targets_foreign_key() {
        let parent = ParentFilter::Category(4);
        assert_eq!(parent.where_clause(None), json!({ "category_id": 4 }));
        assert_eq!(parent.where_clause(Some("pc")), json!({ "pc.category_id": 4 }));
        assert_eq!(ParentFilter::Department(2).column(), "department_id");
    }
}
