pub mod extract;
pub mod response;

pub use extract::{ApiJson, ApiQuery, PathId};
pub use response::{ApiResponse, ApiResult};
