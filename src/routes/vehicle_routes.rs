use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::api_response::{ApiResponse, Paginated};
use crate::dto::vehicle_dto::{
    CreateVehicleRequest, ServicingOverview, ServicingRequest, UpdateVehicleRequest, VehicleFilter,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::vehicle::{Vehicle, VehicleServicing};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiJson, ApiPath, ApiQuery};

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route("/:id", get(get_vehicle).put(update_vehicle).delete(delete_vehicle))
        .route("/:id/servicing", get(get_servicing).post(record_servicing))
}

async fn create_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Vehicle>>), AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.create(&user, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_vehicles(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiQuery(filter): ApiQuery<VehicleFilter>,
) -> Result<Json<ApiResponse<Paginated<Vehicle>>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    Ok(Json(controller.list(&user, filter).await?))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    Ok(Json(controller.get(&user, id).await?))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateVehicleRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    Ok(Json(controller.update(&user, id, request).await?))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    Ok(Json(controller.delete(&user, id).await?))
}

async fn get_servicing(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<ServicingOverview>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    Ok(Json(controller.servicing_overview(&user, id).await?))
}

async fn record_servicing(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<ServicingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VehicleServicing>>), AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.record_servicing(&user, id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
