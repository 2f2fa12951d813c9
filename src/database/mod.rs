pub mod manager;
pub mod models;
pub mod postgres;
pub mod query_builder;
pub mod repository;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use postgres::PgCatalogStore;
pub use repository::{Page, Repository};
pub use store::CatalogStore;
