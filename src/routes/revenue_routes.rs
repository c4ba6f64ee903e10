use axum::{extract::State, routing::get, Extension, Json, Router};

use crate::controllers::revenue_controller::RevenueController;
use crate::dto::api_response::ApiResponse;
use crate::dto::revenue_dto::{RevenueQuery, RevenueReport};
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::ApiQuery;

pub fn create_revenue_router() -> Router<AppState> {
    Router::new().route("/", get(revenue_report))
}

async fn revenue_report(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiQuery(query): ApiQuery<RevenueQuery>,
) -> Result<Json<ApiResponse<RevenueReport>>, AppError> {
    let controller = RevenueController::new(state.pool.clone());
    Ok(Json(controller.report(&user, query).await?))
}
