use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::{AppConfig, StorageBackend};
use crate::database::memory::MemoryStore;
use crate::database::postgres::PgStore;
use crate::database::store::Store;

/// Errors from the storage layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate value for {field}: {value}")]
    Duplicate { field: String, value: String },

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Opens the configured store: PostgreSQL pool or the in-process memory store
pub struct DatabaseManager;

impl DatabaseManager {
    pub async fn open(config: &AppConfig) -> Result<Arc<dyn Store>, DatabaseError> {
        match config.database.backend {
            StorageBackend::Memory => {
                info!("Using in-memory store; data is lost on shutdown");
                Ok(Arc::new(MemoryStore::new()))
            }
            StorageBackend::Postgres => {
                let pool = Self::connect(config).await?;
                if config.database.run_migrations {
                    Self::migrate(&pool).await?;
                }
                Ok(Arc::new(PgStore::new(pool)))
            }
        }
    }

    /// Build a pool from DATABASE_URL and the pool settings
    pub async fn connect(config: &AppConfig) -> Result<PgPool, DatabaseError> {
        let url = config
            .database
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(Duration::from_secs(config.database.connection_timeout))
            .connect(url)
            .await?;

        info!(
            "Created database pool (max {} connections)",
            config.database.max_connections
        );
        Ok(pool)
    }

    /// Apply embedded migrations from ./migrations
    pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::migrate!().run(pool).await?;
        info!("Database migrations applied");
        Ok(())
    }
}
