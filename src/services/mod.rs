pub mod auth_service;
pub mod division_service;
pub mod employee_service;
pub mod images;

pub use auth_service::{AuthService, IssuedToken, LoginInput, ProfileInput};
pub use division_service::DivisionService;
pub use employee_service::{EmployeePatch, EmployeeService, ImageInput, NewEmployee};
pub use images::{DiskImageStore, ImageError, ImageStore, InlineImageStore};
