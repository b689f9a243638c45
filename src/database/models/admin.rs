use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Admin {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of an admin, as returned by /login and /profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProfile {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub phone: String,
    pub email: String,
}

impl From<&Admin> for AdminProfile {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            name: admin.name.clone(),
            username: admin.username.clone(),
            phone: admin.phone.clone(),
            email: admin.email.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
}

/// Full replacement of the editable profile fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: String,
    pub phone: String,
    pub email: String,
}
