// handlers/protected/employee/update.rs - PUT|PATCH /employees/:id handler

use axum::extract::{Path, State};

use super::take_division;
use crate::handlers::protected::parse_id;
use crate::handlers::FormData;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::employee_service::NOT_FOUND_MESSAGE;
use crate::services::EmployeePatch;
use crate::state::AppState;

/// Partial update: only the fields present in the body are validated and written
pub async fn employee_put(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: FormData,
) -> ApiResult {
    update_employee(&state, &id, form).await
}

pub(crate) async fn update_employee(state: &AppState, raw_id: &str, mut form: FormData) -> ApiResult {
    let id = parse_id(raw_id, NOT_FOUND_MESSAGE)?;

    let patch = EmployeePatch {
        name: form.take_text("name"),
        phone: form.take_text("phone"),
        division_id: take_division(&mut form),
        position: form.take_text("position"),
        image: form.take_image("image"),
    };

    state.employees.update(id, patch).await?;

    Ok(ApiResponse::message("Employee updated successfully"))
}
