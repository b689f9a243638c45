use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::division::DivisionSummary;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub id: Uuid,
    /// Inline data URL or storage-relative path, depending on the image store
    pub image: Option<String>,
    pub name: String,
    pub phone: String,
    pub division_id: Uuid,
    pub position: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Employee row joined with its division's name
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeWithDivision {
    pub id: Uuid,
    pub image: Option<String>,
    pub name: String,
    pub phone: String,
    pub division_id: Uuid,
    pub division_name: String,
    pub position: String,
}

/// Listing shape: the division is embedded rather than referenced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeView {
    pub id: Uuid,
    pub image: Option<String>,
    pub name: String,
    pub phone: String,
    pub division: DivisionSummary,
    pub position: String,
}

/// Values written for a new row once validation and image storage are done
#[derive(Debug, Clone)]
pub struct EmployeeRecord {
    pub name: String,
    pub phone: String,
    pub division_id: Uuid,
    pub position: String,
    pub image: Option<String>,
}

/// Column updates; `None` leaves the stored value unchanged
#[derive(Debug, Clone, Default)]
pub struct EmployeeChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub division_id: Option<Uuid>,
    pub position: Option<String>,
    pub image: Option<String>,
}

impl EmployeeChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.division_id.is_none()
            && self.position.is_none()
            && self.image.is_none()
    }

    pub fn apply_to(self, employee: &mut Employee) {
        if let Some(name) = self.name {
            employee.name = name;
        }
        if let Some(phone) = self.phone {
            employee.phone = phone;
        }
        if let Some(division_id) = self.division_id {
            employee.division_id = division_id;
        }
        if let Some(position) = self.position {
            employee.position = position;
        }
        if let Some(image) = self.image {
            employee.image = Some(image);
        }
    }
}

impl From<EmployeeWithDivision> for EmployeeView {
    fn from(row: EmployeeWithDivision) -> Self {
        Self {
            id: row.id,
            image: row.image,
            name: row.name,
            phone: row.phone,
            division: DivisionSummary {
                id: row.division_id,
                name: row.division_name,
            },
            position: row.position,
        }
    }
}
