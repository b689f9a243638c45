use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Server-side record of an issued bearer token. Only the SHA-256 digest is kept.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AdminToken {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub name: String,
    pub token_hash: String,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AdminToken {
    pub fn new(admin_id: Uuid, name: impl Into<String>, token_hash: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            admin_id,
            name: name.into(),
            token_hash: token_hash.into(),
            last_used_at: None,
            created_at: Utc::now(),
        }
    }
}
