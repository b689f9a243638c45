pub mod admin;
pub mod division;
pub mod employee;
pub mod token;

pub use admin::{Admin, AdminProfile, NewAdmin, ProfileUpdate};
pub use division::{Division, DivisionSummary};
pub use employee::{Employee, EmployeeChanges, EmployeeRecord, EmployeeView, EmployeeWithDivision};
pub use token::AdminToken;
