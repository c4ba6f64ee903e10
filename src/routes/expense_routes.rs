use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::expense_controller::ExpenseController;
use crate::dto::api_response::{ApiResponse, Paginated};
use crate::dto::expense_dto::{CreateExpenseRequest, ExpenseFilter, UpdateExpenseRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::expense::Expense;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiJson, ApiPath, ApiQuery};

pub fn create_expense_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_expenses).post(create_expense))
        .route("/:id", get(get_expense).put(update_expense).delete(delete_expense))
}

async fn create_expense(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Expense>>), AppError> {
    let controller = ExpenseController::new(state.pool.clone());
    let response = controller.create(&user, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_expenses(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiQuery(filter): ApiQuery<ExpenseFilter>,
) -> Result<Json<ApiResponse<Paginated<Expense>>>, AppError> {
    let controller = ExpenseController::new(state.pool.clone());
    Ok(Json(controller.list(&user, filter).await?))
}

async fn get_expense(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Expense>>, AppError> {
    let controller = ExpenseController::new(state.pool.clone());
    Ok(Json(controller.get(&user, id).await?))
}

async fn update_expense(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateExpenseRequest>,
) -> Result<Json<ApiResponse<Expense>>, AppError> {
    let controller = ExpenseController::new(state.pool.clone());
    Ok(Json(controller.update(&user, id, request).await?))
}

async fn delete_expense(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = ExpenseController::new(state.pool.clone());
    Ok(Json(controller.delete(&user, id).await?))
}
