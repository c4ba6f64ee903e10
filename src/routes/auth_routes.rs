use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use crate::controllers::auth_controller::AuthController;
use crate::dto::api_response::ApiResponse;
use crate::dto::auth_dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::ApiJson;

/// Rutas públicas de registro y login
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RegisterResponse>>), AppError> {
    let settings = state.settings.load().await?;
    let controller = AuthController::new(state.pool.clone());
    let response = controller.register(&settings, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let settings = state.settings.load().await?;
    let controller = AuthController::new(state.pool.clone());
    let response = controller.login(&settings, &state.jwt_config(), request).await?;
    Ok(Json(response))
}
