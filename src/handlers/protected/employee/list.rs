// handlers/protected/employee/list.rs - GET /employees handler

use axum::extract::State;
use serde::Serialize;

use crate::database::models::EmployeeView;
use crate::handlers::QueryParams;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct EmployeesData {
    pub employees: Vec<EmployeeView>,
}

/// Paginated listing; `name` is a case-insensitive substring, `division_id` an exact match
pub async fn employees_get(
    State(state): State<AppState>,
    query: QueryParams,
) -> ApiResult<EmployeesData> {
    let page = state
        .employees
        .list(query.get("name"), query.get("division_id"), query.get("page"))
        .await?;

    Ok(ApiResponse::paginated(
        "Employees retrieved successfully",
        EmployeesData { employees: page.items },
        page.meta,
    ))
}
