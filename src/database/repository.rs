use serde::Serialize;
use sqlx::{postgres::PgRow, FromRow};

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::query_builder::QueryBuilder;
use crate::filter::{FilterData, Pagination, Source};

/// One page of rows plus the total number of rows matching the filter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64) -> Self {
        Self { items, total }
    }

    /// A page holding every row of an unpaginated result
    pub fn complete(items: Vec<T>) -> Self {
        let total = items.len() as i64;
        Self { items, total }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

pub struct Repository<T> {
    source: Source,
    db: DatabaseManager,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(table_name: impl Into<String>, db: &DatabaseManager) -> Self {
        Self::joined(Source::Table(table_name.into()), db)
    }

    pub fn joined(source: Source, db: &DatabaseManager) -> Self {
        Self {
            source,
            db: db.clone(),
            _phantom: std::marker::PhantomData,
        }
    }

    pub async fn select_any(&self, filter_data: FilterData) -> Result<Vec<T>, DatabaseError> {
        QueryBuilder::<T>::new(self.source.clone())?
            .filter(filter_data)?
            .select_all(&self.db)
            .await
    }

    pub async fn select_one(&self, filter_data: FilterData) -> Result<Option<T>, DatabaseError> {
        QueryBuilder::<T>::new(self.source.clone())?
            .filter(filter_data)?
            .select_optional(&self.db)
            .await
    }

    pub async fn count(&self, filter_data: FilterData) -> Result<i64, DatabaseError> {
        QueryBuilder::<T>::new(self.source.clone())?
            .filter(filter_data)?
            .count(&self.db)
            .await
    }

    /// Fetch one window of rows and the unpaginated total concurrently
    pub async fn select_page(&self, filter_data: FilterData, pagination: &Pagination) -> Result<Page<T>, DatabaseError> {
        let rows = self.select_any(filter_data.clone().paged(pagination));
        let total = self.count(filter_data);
        let (items, total) = futures::try_join!(rows, total)?;
        Ok(Page::new(items, total))
    }
}
