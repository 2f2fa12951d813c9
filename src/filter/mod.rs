pub mod types;
pub mod filter;
pub mod filter_where;
pub mod filter_order;
pub mod pagination;
pub mod search;
pub mod error;

pub use types::*;
pub use filter::Filter;
pub use pagination::{PageQuery, Pagination, ParentFilter};
pub use search::{MatchMode, ProductSearch};
