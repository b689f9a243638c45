// handlers/mod.rs - two-tier handler layout
//
// Public (no token, or guest-only) and Protected (bearer token required).
// Router assembly lives in lib.rs.
pub mod form;
pub mod protected; // bearer token required
pub mod public; // no token required; /login is guest-only
pub mod query;

pub use form::FormData;
pub use query::QueryParams;
