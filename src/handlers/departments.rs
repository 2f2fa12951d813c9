use axum::extract::State;

use crate::database::models::Department;
use crate::middleware::{ApiResponse, ApiResult, PathId};
use crate::server::AppState;

/// GET /departments
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Department>> {
    let departments = state.catalog.list_departments().await?;
    Ok(ApiResponse::success(departments))
}

/// GET /departments/:department_id
pub async fn get(State(state): State<AppState>, PathId(department_id): PathId) -> ApiResult<Department> {
    let department = state.catalog.get_department(department_id).await?;
    Ok(ApiResponse::success(department))
}
