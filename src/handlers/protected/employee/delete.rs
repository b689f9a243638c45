// handlers/protected/employee/delete.rs - DELETE /employees/:id handler

use axum::extract::{Path, State};

use crate::handlers::protected::parse_id;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::employee_service::NOT_FOUND_MESSAGE;
use crate::state::AppState;

pub async fn employee_delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    delete_employee(&state, &id).await
}

pub(crate) async fn delete_employee(state: &AppState, raw_id: &str) -> ApiResult {
    let id = parse_id(raw_id, NOT_FOUND_MESSAGE)?;
    state.employees.delete(id).await?;
    Ok(ApiResponse::message("Employee deleted successfully"))
}
