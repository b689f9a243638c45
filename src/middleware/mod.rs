pub mod auth;
pub mod envelope;
pub mod response;

pub use auth::{bearer_auth_middleware, guest_only_middleware, AuthAdmin};
pub use response::{ApiResponse, ApiResult};
