//! Estado compartido de la aplicación

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::services::storage_service::PhotoStorage;
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub jwt: JwtConfig,
    pub storage: Arc<dyn PhotoStorage>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig, storage: Arc<dyn PhotoStorage>) -> Self {
        let jwt = JwtConfig::from(&config);
        Self {
            pool,
            config,
            jwt,
            storage,
        }
    }
}
