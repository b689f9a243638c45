use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Division {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `{id, name}` shape used in listings and embedded in employees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionSummary {
    pub id: Uuid,
    pub name: String,
}

impl From<Division> for DivisionSummary {
    fn from(division: Division) -> Self {
        Self {
            id: division.id,
            name: division.name,
        }
    }
}
