use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Admin, AdminToken, Division, Employee, EmployeeChanges, EmployeeRecord, EmployeeWithDivision,
    NewAdmin, ProfileUpdate,
};
use crate::types::PageRequest;

/// Case-insensitive substring filter on division name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DivisionFilter {
    pub name: Option<String>,
}

/// Employee listing filters, combined with AND
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub name: Option<String>,
    pub division_id: Option<Uuid>,
}

/// Persistence seam shared by the PostgreSQL and in-memory backends.
///
/// Listings are ordered by primary key and return `(rows, total_matching)`.
#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> Result<(), DatabaseError>;

    // Admins
    async fn insert_admin(&self, admin: NewAdmin) -> Result<Admin, DatabaseError>;
    async fn find_admin_by_username(&self, username: &str) -> Result<Option<Admin>, DatabaseError>;
    /// True when another admin (not `except`) already uses this email
    async fn email_taken(&self, email: &str, except: Uuid) -> Result<bool, DatabaseError>;
    async fn update_admin_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<Admin, DatabaseError>;

    // Tokens
    /// Delete every token of the admin, then store `token`
    async fn replace_tokens(&self, token: AdminToken) -> Result<(), DatabaseError>;
    /// Resolve a token digest to its admin, touching `last_used_at`
    async fn find_admin_by_token(&self, token_hash: &str) -> Result<Option<Admin>, DatabaseError>;
    /// Returns whether a row was removed
    async fn delete_token(&self, token_hash: &str) -> Result<bool, DatabaseError>;

    // Divisions
    async fn insert_division(&self, name: &str) -> Result<Division, DatabaseError>;
    async fn division_exists(&self, id: Uuid) -> Result<bool, DatabaseError>;
    async fn list_divisions(
        &self,
        filter: &DivisionFilter,
        page: PageRequest,
    ) -> Result<(Vec<Division>, u64), DatabaseError>;

    // Employees
    async fn insert_employee(&self, record: EmployeeRecord) -> Result<Employee, DatabaseError>;
    async fn find_employee(&self, id: Uuid) -> Result<Option<Employee>, DatabaseError>;
    /// Returns the updated row, `None` when the id does not exist
    async fn update_employee(
        &self,
        id: Uuid,
        changes: EmployeeChanges,
    ) -> Result<Option<Employee>, DatabaseError>;
    /// Returns the removed row, `None` when the id does not exist
    async fn delete_employee(&self, id: Uuid) -> Result<Option<Employee>, DatabaseError>;
    async fn list_employees(
        &self,
        filter: &EmployeeFilter,
        page: PageRequest,
    ) -> Result<(Vec<EmployeeWithDivision>, u64), DatabaseError>;
}

/// Escape LIKE metacharacters and wrap for a substring match
pub fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// In-process equivalent of `ILIKE '%needle%'`
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
