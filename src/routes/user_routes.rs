use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::user_controller::UserController;
use crate::dto::api_response::ApiResponse;
use crate::dto::user_dto::{CreateUserRequest, UpdateProfileRequest};
use crate::middleware::auth::{admin_only_middleware, AuthenticatedUser};
use crate::models::user::User;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::ApiJson;

pub fn create_profile_router() -> Router<AppState> {
    Router::new().route("/", get(get_profile).put(update_profile))
}

/// Gestión de usuarios de la empresa, sólo administradores
pub fn create_user_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route_layer(middleware::from_fn(admin_only_middleware))
}

async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    Ok(Json(controller.profile(&user).await?))
}

async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    Ok(Json(controller.update_profile(&user, request).await?))
}

async fn create_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), AppError> {
    let controller = UserController::new(state.pool.clone());
    let response = controller.create_user(&user, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<User>>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    Ok(Json(controller.list_users(&user).await?))
}
