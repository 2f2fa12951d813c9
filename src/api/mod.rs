pub mod format;
pub mod messages;

pub use format::{PaginatedResponse, PaginationMeta};
pub use messages::{ErrorCatalog, ErrorCode};
