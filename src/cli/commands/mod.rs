pub mod auth;
pub mod division;
pub mod employee;
pub mod profile;
pub mod server;
