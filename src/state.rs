//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. No hay otro estado en memoria entre peticiones.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::services::rental_calculator::RentalPolicy;
use crate::services::settings::{PgSettingsProvider, SettingsProvider};
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub settings: Arc<dyn SettingsProvider>,
}

impl AppState {
    /// Estado con la configuración del sistema respaldada por la base de datos
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let settings = Arc::new(PgSettingsProvider::new(pool.clone()));
        Self::with_settings(pool, config, settings)
    }

    pub fn with_settings(
        pool: PgPool,
        config: EnvironmentConfig,
        settings: Arc<dyn SettingsProvider>,
    ) -> Self {
        Self {
            pool,
            config,
            settings,
        }
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig::from(&self.config)
    }

    pub fn rental_policy(&self) -> RentalPolicy {
        self.config.rental_policy
    }
}
