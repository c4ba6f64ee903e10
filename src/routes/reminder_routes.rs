use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::reminder_controller::ReminderController;
use crate::dto::api_response::ApiResponse;
use crate::dto::reminder_dto::{
    AcknowledgeResponse, CreateReminderRequest, DeleteReminderQuery, ReminderFilter,
    UpdateReminderRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::reminder::{Reminder, ReminderAcknowledgement};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiJson, ApiPath, ApiQuery};

pub fn create_reminder_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reminders).post(create_reminder))
        .route("/due", get(due_reminders))
        .route("/:id", put(update_reminder).delete(delete_reminder))
        .route("/:id/acknowledge", post(acknowledge_reminder))
        .route("/:id/history", get(reminder_history))
}

async fn create_reminder(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<CreateReminderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Reminder>>), AppError> {
    let controller = ReminderController::new(state.pool.clone());
    let response = controller.create(&user, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_reminders(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiQuery(filter): ApiQuery<ReminderFilter>,
) -> Result<Json<ApiResponse<Vec<Reminder>>>, AppError> {
    let controller = ReminderController::new(state.pool.clone());
    Ok(Json(controller.list(&user, filter).await?))
}

async fn due_reminders(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<Reminder>>>, AppError> {
    let controller = ReminderController::new(state.pool.clone());
    Ok(Json(controller.due(&user).await?))
}

async fn acknowledge_reminder(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<AcknowledgeResponse>>, AppError> {
    let controller = ReminderController::new(state.pool.clone());
    Ok(Json(controller.acknowledge(&user, id).await?))
}

async fn reminder_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Vec<ReminderAcknowledgement>>>, AppError> {
    let controller = ReminderController::new(state.pool.clone());
    Ok(Json(controller.history(&user, id).await?))
}

async fn update_reminder(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateReminderRequest>,
) -> Result<Json<ApiResponse<Reminder>>, AppError> {
    let controller = ReminderController::new(state.pool.clone());
    Ok(Json(controller.update(&user, id, request).await?))
}

async fn delete_reminder(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<DeleteReminderQuery>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = ReminderController::new(state.pool.clone());
    Ok(Json(controller.delete(&user, id, query).await?))
}
