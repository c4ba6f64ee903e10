//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use anyhow::{Context, Result};
use std::env;

use crate::services::rental_calculator::RentalPolicy;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    pub run_migrations: bool,
    pub rental_policy: RentalPolicy,
}

impl EnvironmentConfig {
    /// Cargar la configuración desde variables de entorno
    pub fn from_env() -> Result<Self> {
        let half_day_threshold_hours = match env::var("HALF_DAY_THRESHOLD_HOURS") {
            Ok(value) => value
                .parse()
                .context("HALF_DAY_THRESHOLD_HOURS must be a valid number")?,
            Err(_) => RentalPolicy::default().half_day_threshold_hours,
        };

        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_expiration: env::var("JWT_EXPIRATION")
                .unwrap_or_else(|_| "86400".to_string())
                .parse()
                .context("JWT_EXPIRATION must be a valid number")?,
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            run_migrations: env::var("RUN_MIGRATIONS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            rental_policy: RentalPolicy::new(half_day_threshold_hours)
                .context("HALF_DAY_THRESHOLD_HOURS must be between 1 and 23")?,
        })
    }

    /// Obtener la dirección de escucha del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
