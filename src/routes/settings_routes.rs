use axum::{extract::State, routing::get, Extension, Json, Router};

use crate::controllers::settings_controller::SettingsController;
use crate::dto::api_response::ApiResponse;
use crate::dto::settings_dto::UpdateSettingsRequest;
use crate::middleware::auth::AuthenticatedUser;
use crate::services::settings::SystemSettings;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::ApiJson;

pub fn create_settings_router() -> Router<AppState> {
    Router::new().route("/", get(get_settings).put(update_settings))
}

async fn get_settings(State(state): State<AppState>) -> Result<Json<ApiResponse<SystemSettings>>, AppError> {
    let controller = SettingsController::new(state.settings.clone());
    Ok(Json(controller.get().await?))
}

async fn update_settings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<UpdateSettingsRequest>,
) -> Result<Json<ApiResponse<SystemSettings>>, AppError> {
    let controller = SettingsController::new(state.settings.clone());
    Ok(Json(controller.update(&user, request).await?))
}
