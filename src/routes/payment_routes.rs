use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::payment_controller::PaymentController;
use crate::dto::api_response::ApiResponse;
use crate::dto::payment_dto::{CreatePaymentRequest, PaymentSummary, VerifyPaymentRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::payment::Payment;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiJson, ApiPath};

pub fn create_payment_router() -> Router<AppState> {
    Router::new()
        .route("/:sale_id", get(list_payments).post(create_payment))
        .route("/:sale_id/:payment_id/verify", post(verify_payment))
        .route("/:sale_id/:payment_id/cancel", post(cancel_payment))
}

async fn create_payment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(sale_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Payment>>), AppError> {
    let controller = PaymentController::new(state.pool.clone());
    let response = controller.create(&user, sale_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_payments(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(sale_id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<PaymentSummary>>, AppError> {
    let controller = PaymentController::new(state.pool.clone());
    Ok(Json(controller.list(&user, sale_id).await?))
}

async fn verify_payment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath((sale_id, payment_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(request): ApiJson<VerifyPaymentRequest>,
) -> Result<Json<ApiResponse<PaymentSummary>>, AppError> {
    let controller = PaymentController::new(state.pool.clone());
    Ok(Json(controller.verify(&user, sale_id, payment_id, request).await?))
}

async fn cancel_payment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath((sale_id, payment_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<Payment>>, AppError> {
    let controller = PaymentController::new(state.pool.clone());
    Ok(Json(controller.cancel(&user, sale_id, payment_id).await?))
}
