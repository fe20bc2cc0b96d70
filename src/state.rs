use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{auth::providers::AuthProvider, config::AppConfig};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DatabaseConnection,
    pub auth: Arc<dyn AuthProvider>,
}

impl AppState {
    pub fn new(config: AppConfig, db: DatabaseConnection, auth: Arc<dyn AuthProvider>) -> Arc<Self> {
        Arc::new(Self { config, db, auth })
    }
}
