use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::{DatabaseError, DatabaseManager, Store};
use crate::services::{images, AuthService, DivisionService, EmployeeService, ImageStore};

/// Shared handler state: configuration, the store, and the services built on it
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
    pub images: Arc<dyn ImageStore>,
    pub auth: AuthService,
    pub divisions: DivisionService,
    pub employees: EmployeeService,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Store>, images: Arc<dyn ImageStore>) -> Self {
        let auth = AuthService::new(store.clone(), &config.security);
        let divisions = DivisionService::new(store.clone(), config.api.page_size);
        let employees = EmployeeService::new(
            store.clone(),
            images.clone(),
            config.api.page_size,
            config.images.max_upload_kb,
        );

        Self {
            config: Arc::new(config),
            store,
            images,
            auth,
            divisions,
            employees,
        }
    }

    /// Open the configured store and image storage
    pub async fn from_config(config: AppConfig) -> Result<Self, DatabaseError> {
        let store = DatabaseManager::open(&config).await?;
        let images = images::from_config(&config.images);
        Ok(Self::new(config, store, images))
    }
}
