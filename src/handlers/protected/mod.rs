// handlers/protected/mod.rs - endpoints behind the bearer token middleware
//
// Every handler here can rely on an `AuthAdmin` request extension.
pub mod auth; // POST /logout, PUT /profile
pub mod division; // GET /divisions
pub mod employee; // /employees CRUD

use uuid::Uuid;

use crate::error::ApiError;

/// Parse a path id; anything that is not a UUID cannot exist
pub(crate) fn parse_id(raw: &str, not_found: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::not_found(not_found))
}
