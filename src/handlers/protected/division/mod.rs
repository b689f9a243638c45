pub mod list;

pub use list::divisions_get;
