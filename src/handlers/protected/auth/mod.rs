pub mod logout;
pub mod profile;

pub use logout::logout_post;
pub use profile::profile_put;
