use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Admin, AdminToken, Division, Employee, EmployeeChanges, EmployeeRecord, EmployeeWithDivision,
    NewAdmin, ProfileUpdate,
};
use crate::database::store::{contains_ignore_case, DivisionFilter, EmployeeFilter, Store};
use crate::types::PageRequest;

#[derive(Debug, Default)]
struct MemoryState {
    admins: BTreeMap<Uuid, Admin>,
    // keyed by token digest
    tokens: BTreeMap<String, AdminToken>,
    divisions: BTreeMap<Uuid, Division>,
    employees: BTreeMap<Uuid, Employee>,
}

/// In-process store for development and tests. Keys are UUIDv7, so map
/// iteration order is id order like the `ORDER BY id` of the SQL store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn paginate<T>(rows: Vec<T>, page: PageRequest) -> (Vec<T>, u64) {
    let total = rows.len() as u64;
    let items = rows
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    (items, total)
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn insert_admin(&self, admin: NewAdmin) -> Result<Admin, DatabaseError> {
        let mut state = self.state.write().await;

        if state.admins.values().any(|a| a.username == admin.username) {
            return Err(DatabaseError::Duplicate {
                field: "username".to_string(),
                value: admin.username,
            });
        }
        if state.admins.values().any(|a| a.email == admin.email) {
            return Err(DatabaseError::Duplicate {
                field: "email".to_string(),
                value: admin.email,
            });
        }

        let now = Utc::now();
        let row = Admin {
            id: Uuid::now_v7(),
            name: admin.name,
            username: admin.username,
            email: admin.email,
            phone: admin.phone,
            password_hash: admin.password_hash,
            created_at: now,
            updated_at: now,
        };
        state.admins.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_admin_by_username(&self, username: &str) -> Result<Option<Admin>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state.admins.values().find(|a| a.username == username).cloned())
    }

    async fn email_taken(&self, email: &str, except: Uuid) -> Result<bool, DatabaseError> {
        let state = self.state.read().await;
        Ok(state.admins.values().any(|a| a.email == email && a.id != except))
    }

    async fn update_admin_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<Admin, DatabaseError> {
        let mut state = self.state.write().await;

        if state.admins.values().any(|a| a.email == update.email && a.id != id) {
            return Err(DatabaseError::Duplicate {
                field: "email".to_string(),
                value: update.email,
            });
        }

        let admin = state
            .admins
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("admin {}", id)))?;
        admin.name = update.name;
        admin.phone = update.phone;
        admin.email = update.email;
        admin.updated_at = Utc::now();
        Ok(admin.clone())
    }

    async fn replace_tokens(&self, token: AdminToken) -> Result<(), DatabaseError> {
        let mut state = self.state.write().await;
        state.tokens.retain(|_, t| t.admin_id != token.admin_id);
        state.tokens.insert(token.token_hash.clone(), token);
        Ok(())
    }

    async fn find_admin_by_token(&self, token_hash: &str) -> Result<Option<Admin>, DatabaseError> {
        let mut state = self.state.write().await;
        let Some(token) = state.tokens.get_mut(token_hash) else {
            return Ok(None);
        };
        token.last_used_at = Some(Utc::now());
        let admin_id = token.admin_id;
        Ok(state.admins.get(&admin_id).cloned())
    }

    async fn delete_token(&self, token_hash: &str) -> Result<bool, DatabaseError> {
        Ok(self.state.write().await.tokens.remove(token_hash).is_some())
    }

    async fn insert_division(&self, name: &str) -> Result<Division, DatabaseError> {
        let now = Utc::now();
        let division = Division {
            id: Uuid::now_v7(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.state
            .write()
            .await
            .divisions
            .insert(division.id, division.clone());
        Ok(division)
    }

    async fn division_exists(&self, id: Uuid) -> Result<bool, DatabaseError> {
        Ok(self.state.read().await.divisions.contains_key(&id))
    }

    async fn list_divisions(
        &self,
        filter: &DivisionFilter,
        page: PageRequest,
    ) -> Result<(Vec<Division>, u64), DatabaseError> {
        let state = self.state.read().await;
        let rows: Vec<Division> = state
            .divisions
            .values()
            .filter(|d| match &filter.name {
                Some(needle) => contains_ignore_case(&d.name, needle),
                None => true,
            })
            .cloned()
            .collect();
        Ok(paginate(rows, page))
    }

    async fn insert_employee(&self, record: EmployeeRecord) -> Result<Employee, DatabaseError> {
        let mut state = self.state.write().await;

        // Mirrors the foreign key on employees.division_id
        if !state.divisions.contains_key(&record.division_id) {
            return Err(DatabaseError::NotFound(format!("division {}", record.division_id)));
        }

        let now = Utc::now();
        let employee = Employee {
            id: Uuid::now_v7(),
            image: record.image,
            name: record.name,
            phone: record.phone,
            division_id: record.division_id,
            position: record.position,
            created_at: now,
            updated_at: now,
        };
        state.employees.insert(employee.id, employee.clone());
        Ok(employee)
    }

    async fn find_employee(&self, id: Uuid) -> Result<Option<Employee>, DatabaseError> {
        Ok(self.state.read().await.employees.get(&id).cloned())
    }

    async fn update_employee(
        &self,
        id: Uuid,
        changes: EmployeeChanges,
    ) -> Result<Option<Employee>, DatabaseError> {
        let mut state = self.state.write().await;

        if let Some(division_id) = changes.division_id {
            if !state.divisions.contains_key(&division_id) {
                return Err(DatabaseError::NotFound(format!("division {}", division_id)));
            }
        }

        let Some(employee) = state.employees.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply_to(employee);
        employee.updated_at = Utc::now();
        Ok(Some(employee.clone()))
    }

    async fn delete_employee(&self, id: Uuid) -> Result<Option<Employee>, DatabaseError> {
        Ok(self.state.write().await.employees.remove(&id))
    }

    async fn list_employees(
        &self,
        filter: &EmployeeFilter,
        page: PageRequest,
    ) -> Result<(Vec<EmployeeWithDivision>, u64), DatabaseError> {
        let state = self.state.read().await;
        let rows: Vec<EmployeeWithDivision> = state
            .employees
            .values()
            .filter(|e| match &filter.name {
                Some(needle) => contains_ignore_case(&e.name, needle),
                None => true,
            })
            .filter(|e| match filter.division_id {
                Some(division_id) => e.division_id == division_id,
                None => true,
            })
            .filter_map(|e| {
                let division = state.divisions.get(&e.division_id)?;
                Some(EmployeeWithDivision {
                    id: e.id,
                    image: e.image.clone(),
                    name: e.name.clone(),
                    phone: e.phone.clone(),
                    division_id: e.division_id,
                    division_name: division.name.clone(),
                    position: e.position.clone(),
                })
            })
            .collect();
        Ok(paginate(rows, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin(username: &str, email: &str) -> NewAdmin {
        NewAdmin {
            name: "Test".into(),
            username: username.into(),
            email: email.into(),
            phone: "0800".into(),
            password_hash: "x".into(),
        }
    }

    fn record(name: &str, division_id: Uuid) -> EmployeeRecord {
        EmployeeRecord {
            name: name.into(),
            phone: "0812".into(),
            division_id,
            position: "Engineer".into(),
            image: None,
        }
    }

    #[tokio::test]
    async fn replacing_tokens_keeps_only_the_newest() {
        let store = MemoryStore::new();
        let a = store.insert_admin(admin("admin", "a@x.com")).await.unwrap();

        store.replace_tokens(AdminToken::new(a.id, "auth_token", "first")).await.unwrap();
        store.replace_tokens(AdminToken::new(a.id, "auth_token", "second")).await.unwrap();

        assert!(store.find_admin_by_token("first").await.unwrap().is_none());
        assert_eq!(store.find_admin_by_token("second").await.unwrap().unwrap().id, a.id);
        assert!(store.delete_token("second").await.unwrap());
        assert!(!store.delete_token("second").await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_username_and_email_rejected() {
        let store = MemoryStore::new();
        store.insert_admin(admin("admin", "a@x.com")).await.unwrap();

        let err = store.insert_admin(admin("admin", "b@x.com")).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Duplicate { ref field, .. } if field == "username"));

        let err = store.insert_admin(admin("other", "a@x.com")).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Duplicate { ref field, .. } if field == "email"));
    }

    #[tokio::test]
    async fn employee_listing_filters_and_paginates() {
        let store = MemoryStore::new();
        let qa = store.insert_division("QA").await.unwrap();
        let backend = store.insert_division("Backend").await.unwrap();

        for i in 0..12 {
            let division = if i % 2 == 0 { qa.id } else { backend.id };
            store.insert_employee(record(&format!("Employee {i}"), division)).await.unwrap();
        }

        let (rows, total) = store
            .list_employees(&EmployeeFilter::default(), PageRequest::new(2, 10))
            .await
            .unwrap();
        assert_eq!(total, 12);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Employee 10");

        let filter = EmployeeFilter {
            name: Some("employee 1".into()),
            division_id: Some(backend.id),
        };
        let (rows, total) = store.list_employees(&filter, PageRequest::new(1, 10)).await.unwrap();
        // Employee 1 and Employee 11 are both odd, so both are in Backend
        assert_eq!(total, 2);
        assert!(rows.iter().all(|r| r.division_name == "Backend"));
    }

    #[tokio::test]
    async fn update_of_missing_employee_returns_none() {
        let store = MemoryStore::new();
        let changes = EmployeeChanges {
            position: Some("Lead".into()),
            ..Default::default()
        };
        assert!(store.update_employee(Uuid::now_v7(), changes).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn insert_rejects_unknown_division() {
        let store = MemoryStore::new();
        let err = store.insert_employee(record("Nobody", Uuid::now_v7())).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(_)));
        let (_, total) = store
            .list_employees(&EmployeeFilter::default(), PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_eq!(total, 0);
    }
}
