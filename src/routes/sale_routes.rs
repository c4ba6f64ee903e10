use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::sale_controller::SaleController;
use crate::dto::api_response::{ApiResponse, Paginated};
use crate::dto::sale_dto::{
    ChargeRequest, CreateSaleRequest, DeliverSaleRequest, DisabledDatesQuery, ReturnSaleRequest,
    SaleDetail, SaleFilter, SalePatch, UpdateChargeRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::sale::Sale;
use crate::services::availability::BookedRange;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiJson, ApiPath, ApiQuery};

pub fn create_sale_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sales).post(create_sale))
        .route("/:id", get(get_sale).put(update_sale))
        .route("/:id/deliver", post(deliver_sale))
        .route("/:id/return", post(return_sale))
        .route("/:id/cancel", post(cancel_sale))
        .route("/:id/charges", post(add_charge))
        .route("/:id/charges/:charge_id", put(update_charge).delete(delete_charge))
}

pub fn create_availability_router() -> Router<AppState> {
    Router::new().route("/", get(disabled_dates))
}

fn controller(state: &AppState) -> SaleController {
    SaleController::new(state.pool.clone(), state.rental_policy())
}

async fn create_sale(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<CreateSaleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SaleDetail>>), AppError> {
    let response = controller(&state).create(&user, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_sales(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiQuery(filter): ApiQuery<SaleFilter>,
) -> Result<Json<ApiResponse<Paginated<Sale>>>, AppError> {
    Ok(Json(controller(&state).list(&user, filter).await?))
}

async fn get_sale(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<SaleDetail>>, AppError> {
    Ok(Json(controller(&state).get(&user, id).await?))
}

async fn update_sale(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<SalePatch>,
) -> Result<Json<ApiResponse<SaleDetail>>, AppError> {
    Ok(Json(controller(&state).update(&user, id, patch).await?))
}

async fn deliver_sale(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<DeliverSaleRequest>,
) -> Result<Json<ApiResponse<SaleDetail>>, AppError> {
    Ok(Json(controller(&state).deliver(&user, id, request).await?))
}

async fn return_sale(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<ReturnSaleRequest>,
) -> Result<Json<ApiResponse<SaleDetail>>, AppError> {
    Ok(Json(controller(&state).return_vehicle(&user, id, request).await?))
}

async fn cancel_sale(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Sale>>, AppError> {
    Ok(Json(controller(&state).cancel(&user, id).await?))
}

async fn add_charge(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<ChargeRequest>,
) -> Result<Json<ApiResponse<SaleDetail>>, AppError> {
    Ok(Json(controller(&state).add_charge(&user, id, request).await?))
}

async fn update_charge(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath((id, charge_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(request): ApiJson<UpdateChargeRequest>,
) -> Result<Json<ApiResponse<SaleDetail>>, AppError> {
    Ok(Json(
        controller(&state)
            .update_charge(&user, id, charge_id, request)
            .await?,
    ))
}

async fn delete_charge(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath((id, charge_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<SaleDetail>>, AppError> {
    Ok(Json(controller(&state).delete_charge(&user, id, charge_id).await?))
}

async fn disabled_dates(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiQuery(query): ApiQuery<DisabledDatesQuery>,
) -> Result<Json<ApiResponse<Vec<BookedRange>>>, AppError> {
    Ok(Json(controller(&state).disabled_dates(&user, query).await?))
}
