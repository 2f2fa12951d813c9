// handlers/mod.rs - Catalog HTTP handlers, one module per resource
//
// Every handler extracts path/query/body parameters, calls into the shared
// CatalogService held in AppState, and returns ApiResult<T>. Errors convert
// to the uniform `{ error: { status, code, message, field } }` body.

pub mod attributes;
pub mod categories;
pub mod departments;
pub mod products;
pub mod reviews;
pub mod system;
