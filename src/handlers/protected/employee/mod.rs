// handlers/protected/employee/mod.rs - employee CRUD
pub mod create; // POST /employees
pub mod delete; // DELETE /employees/:id
pub mod list; // GET /employees
pub mod method_override; // POST /employees/:id with _method
pub mod update; // PUT|PATCH /employees/:id

pub use create::employees_post;
pub use delete::employee_delete;
pub use list::employees_get;
pub use method_override::employee_post_override;
pub use update::employee_put;

use crate::handlers::FormData;

/// Read the division either as `division_id` or as the `division` alias
pub(crate) fn take_division(form: &mut FormData) -> Option<String> {
    let primary = form.take_text("division_id");
    let alias = form.take_text("division");
    primary.or(alias)
}
