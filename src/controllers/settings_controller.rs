use std::sync::Arc;

use tracing::info;

use crate::dto::api_response::ApiResponse;
use crate::dto::settings_dto::UpdateSettingsRequest;
use crate::middleware::auth::AuthenticatedUser;
use crate::services::settings::{SettingsProvider, SystemSettings};
use crate::utils::errors::AppError;

pub struct SettingsController {
    provider: Arc<dyn SettingsProvider>,
}

impl SettingsController {
    pub fn new(provider: Arc<dyn SettingsProvider>) -> Self {
        Self { provider }
    }

    pub async fn get(&self) -> Result<ApiResponse<SystemSettings>, AppError> {
        let settings = self.provider.load().await?;
        Ok(ApiResponse::success(settings))
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        request: UpdateSettingsRequest,
    ) -> Result<ApiResponse<SystemSettings>, AppError> {
        user.require_admin("change system settings")?;

        let current = self.provider.load().await?;
        let settings = self.provider.store(request.merge(current)).await?;
        info!("⚙️ Configuración cambiada por {}", user.username);

        Ok(ApiResponse::success_with_message(settings, "Settings updated"))
    }
}
