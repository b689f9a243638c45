// handlers/protected/employee/create.rs - POST /employees handler

use axum::extract::State;

use super::take_division;
use crate::handlers::FormData;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::NewEmployee;
use crate::state::AppState;

/**
 * POST /employees - Create an employee
 *
 * Fields: name, phone, division_id (or division), position, optional image
 * file (jpeg/png/gif). Responds 201 with a message-only envelope.
 */
pub async fn employees_post(State(state): State<AppState>, mut form: FormData) -> ApiResult {
    let input = NewEmployee {
        name: form.take_text("name"),
        phone: form.take_text("phone"),
        division_id: take_division(&mut form),
        position: form.take_text("position"),
        image: form.take_image("image"),
    };

    state.employees.create(input).await?;

    Ok(ApiResponse::message("Employee created successfully").created())
}
