//! Rutas HTTP
//!
//! `create_router` monta las rutas públicas (`/health`, `/register`,
//! `/login`) y protege el resto con `auth_middleware`.

pub mod auth_routes;
pub mod expense_routes;
pub mod payment_routes;
pub mod reminder_routes;
pub mod revenue_routes;
pub mod sale_routes;
pub mod settings_routes;
pub mod user_routes;
pub mod vehicle_routes;

use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    http::StatusCode,
    middleware,
    routing::get,
    BoxError, Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::dto::api_response::ApiResponse;
use crate::middleware::{auth::auth_middleware, cors::cors_layer};
use crate::state::AppState;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Router completo de la aplicación
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .nest("/profile", user_routes::create_profile_router())
        .nest("/users", user_routes::create_user_router())
        .nest("/settings", settings_routes::create_settings_router())
        .nest("/vehical", vehicle_routes::create_vehicle_router())
        .nest("/sales", sale_routes::create_sale_router())
        .nest("/disabled-dates", sale_routes::create_availability_router())
        .nest("/payments", payment_routes::create_payment_router())
        .nest("/reminders", reminder_routes::create_reminder_router())
        .nest("/expenses", expense_routes::create_expense_router())
        .nest("/revenue", revenue_routes::create_revenue_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health))
        .merge(auth_routes::create_auth_router())
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_origins))
                .layer(HandleErrorLayer::new(handle_timeout))
                .timeout(REQUEST_TIMEOUT),
        )
        .with_state(state)
}

async fn health() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::success_with_message(
        json!({
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }),
        "OK",
    ))
}

async fn handle_timeout(error: BoxError) -> (StatusCode, Json<Value>) {
    if error.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("⏱️ Petición cancelada por timeout");
        return (
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({
                "status": "error",
                "message": "Request timed out",
                "code": "TIMEOUT",
                "data": null,
            })),
        );
    }

    tracing::error!("❌ Error no controlado en la capa de servicio: {}", error);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "status": "error",
            "message": "Internal server error",
            "code": "INTERNAL_ERROR",
            "data": null,
        })),
    )
}
