//! Configuración del sistema modificable en caliente
//!
//! `enable_registration` y `enable_login` se leen en cada petición a través
//! de un `SettingsProvider` inyectado en el estado de la aplicación.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::repositories::settings_repository::SettingsRepository;
use crate::utils::errors::{AppError, AppResult};

pub const ENABLE_REGISTRATION: &str = "enable_registration";
pub const ENABLE_LOGIN: &str = "enable_login";

/// Foto de la configuración en un instante
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSettings {
    pub enable_registration: bool,
    pub enable_login: bool,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            enable_registration: true,
            enable_login: true,
        }
    }
}

impl SystemSettings {
    pub fn ensure_registration_enabled(&self) -> AppResult<()> {
        if !self.enable_registration {
            return Err(AppError::Forbidden("Registration is currently disabled".to_string()));
        }
        Ok(())
    }

    pub fn ensure_login_enabled(&self) -> AppResult<()> {
        if !self.enable_login {
            return Err(AppError::Forbidden("Login is currently disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
pub trait SettingsProvider: Send + Sync {
    async fn load(&self) -> AppResult<SystemSettings>;
    async fn store(&self, settings: SystemSettings) -> AppResult<SystemSettings>;
}

/// Proveedor respaldado por la tabla `system_settings`
pub struct PgSettingsProvider {
    repository: SettingsRepository,
}

impl PgSettingsProvider {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: SettingsRepository::new(pool),
        }
    }
}

#[async_trait]
impl SettingsProvider for PgSettingsProvider {
    async fn load(&self) -> AppResult<SystemSettings> {
        let mut settings = SystemSettings::default();
        for (key, value) in self.repository.find_all().await? {
            match key.as_str() {
                ENABLE_REGISTRATION => settings.enable_registration = value,
                ENABLE_LOGIN => settings.enable_login = value,
                other => tracing::debug!("⚙️ Clave de configuración ignorada: {}", other),
            }
        }
        Ok(settings)
    }

    async fn store(&self, settings: SystemSettings) -> AppResult<SystemSettings> {
        self.repository
            .upsert_many(&[
                (ENABLE_REGISTRATION, settings.enable_registration),
                (ENABLE_LOGIN, settings.enable_login),
            ])
            .await?;
        tracing::info!(
            "⚙️ Configuración actualizada: registration={}, login={}",
            settings.enable_registration,
            settings.enable_login
        );
        Ok(settings)
    }
}

/// Proveedor en memoria, para pruebas y despliegues sin tabla de configuración
#[derive(Default)]
pub struct StaticSettingsProvider {
    settings: RwLock<SystemSettings>,
}

impl StaticSettingsProvider {
    pub fn new(settings: SystemSettings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }
}

#[async_trait]
impl SettingsProvider for StaticSettingsProvider {
    async fn load(&self) -> AppResult<SystemSettings> {
        Ok(*self.settings.read().await)
    }

    async fn store(&self, settings: SystemSettings) -> AppResult<SystemSettings> {
        *self.settings.write().await = settings;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_provider_roundtrip() {
        let provider = StaticSettingsProvider::default();
        assert_eq!(provider.load().await.unwrap(), SystemSettings::default());

        let disabled = SystemSettings {
            enable_registration: false,
            enable_login: true,
        };
        provider.store(disabled).await.unwrap();
        assert_eq!(provider.load().await.unwrap(), disabled);
    }

    #[test]
    fn test_gates() {
        let settings = SystemSettings {
            enable_registration: false,
            enable_login: false,
        };
        assert!(matches!(
            settings.ensure_registration_enabled(),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(settings.ensure_login_enabled(), Err(AppError::Forbidden(_))));
        assert!(SystemSettings::default().ensure_login_enabled().is_ok());
    }
}
