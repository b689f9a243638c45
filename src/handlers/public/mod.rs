// handlers/public/mod.rs - endpoints reachable without a bearer token
pub mod login; // POST /login (guest-only)
pub mod system; // GET /, GET /health, 404 fallback

pub use login::login_post;
pub use system::{health, not_found, root};
