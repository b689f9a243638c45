// handlers/protected/employee/method_override.rs - POST /employees/:id handler
//
// HTML forms can only send multipart bodies with POST, so clients tunnel
// PUT/PATCH/DELETE through a `_method` field.

use axum::extract::{Path, State};

use super::delete::delete_employee;
use super::update::update_employee;
use crate::error::ApiError;
use crate::handlers::FormData;
use crate::middleware::ApiResult;
use crate::state::AppState;

pub async fn employee_post_override(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut form: FormData,
) -> ApiResult {
    let method = form.take_text("_method").unwrap_or_default().to_ascii_uppercase();

    match method.as_str() {
        "PUT" | "PATCH" => update_employee(&state, &id, form).await,
        "DELETE" => delete_employee(&state, &id).await,
        _ => Err(ApiError::method_not_allowed(
            "The POST method is not supported for this route. Supported methods: PUT, PATCH, DELETE.",
        )),
    }
}
