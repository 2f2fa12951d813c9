use sqlx::{self, postgres::PgArguments, FromRow, Row};
use std::time::Instant;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::filter::{Filter, FilterData, Source};
use crate::filter::types::{SqlParam, SqlResult};

pub struct QueryBuilder<T> {
    source: Source,
    filter: Filter,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> QueryBuilder<T>
where
    T: for<'r> FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
{
    pub fn new(source: Source) -> Result<Self, DatabaseError> {
        let filter = Filter::new(source.clone())?;
        Ok(Self {
            source,
            filter,
            _phantom: std::marker::PhantomData,
        })
    }

    pub fn filter(mut self, filter_data: FilterData) -> Result<Self, DatabaseError> {
        let mut filter = Filter::new(self.source.clone())?;
        filter.assign(filter_data)?;
        self.filter = filter;
        Ok(self)
    }

    pub async fn select_all(self, db: &DatabaseManager) -> Result<Vec<T>, DatabaseError> {
        let sql_result = self.filter.to_sql()?;
        db.log_query(&sql_result.query);
        let started = Instant::now();
        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let rows = q.fetch_all(db.pool()).await?;
        db.observe_duration("select", started);
        Ok(rows)
    }

    pub async fn select_optional(self, db: &DatabaseManager) -> Result<Option<T>, DatabaseError> {
        let sql_result = self.filter.to_sql()?;
        db.log_query(&sql_result.query);
        let started = Instant::now();
        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let row = q.fetch_optional(db.pool()).await?;
        db.observe_duration("select", started);
        Ok(row)
    }

    pub async fn count(self, db: &DatabaseManager) -> Result<i64, DatabaseError> {
        let sql_result: SqlResult = self.filter.to_count_sql()?;
        db.log_query(&sql_result.query);
        let started = Instant::now();
        let mut q = sqlx::query(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query(q, p);
        }
        let row = q.fetch_one(db.pool()).await?;
        db.observe_duration("count", started);
        let count: i64 = row.try_get("count")?;
        Ok(count)
    }
}

fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    p: &'q SqlParam,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match p {
        SqlParam::Bool(b) => q.bind(*b),
        SqlParam::Int(i) => q.bind(*i),
        SqlParam::Float(f) => q.bind(*f),
        SqlParam::Text(s) => q.bind(s.as_str()),
    }
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    p: &'q SqlParam,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match p {
        SqlParam::Bool(b) => q.bind(*b),
        SqlParam::Int(i) => q.bind(*i),
        SqlParam::Float(f) => q.bind(*f),
        SqlParam::Text(s) => q.bind(s.as_str()),
    }
}
