// handlers/public/login.rs - POST /login handler

use axum::extract::State;
use serde::Serialize;

use crate::database::models::AdminProfile;
use crate::handlers::FormData;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::LoginInput;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LoginData {
    pub token: String,
    pub admin: AdminProfile,
}

/**
 * POST /login - Authenticate an admin and receive a bearer token
 *
 * Input: `username`, `password` (form, multipart or JSON).
 * Any token the admin held before is revoked.
 *
 * Errors: 422 when a field is missing, 401 on a bad username or password,
 * 403 when the request already carries a valid token.
 */
pub async fn login_post(State(state): State<AppState>, mut form: FormData) -> ApiResult<LoginData> {
    let input = LoginInput {
        username: form.take_text("username"),
        password: form.take_text("password"),
    };

    let issued = state.auth.login(input).await?;

    Ok(ApiResponse::success(
        "Login successful",
        LoginData {
            token: issued.token,
            admin: AdminProfile::from(&issued.admin),
        },
    ))
}
