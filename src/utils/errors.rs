//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP con el sobre estándar
//! `{status, message, data}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Hash error: {0}")]
    Hash(String),
}

/// Respuesta de error para la API
#[derive(Debug, Serialize)]
struct ErrorResponse {
    status: &'static str,
    message: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<serde_json::Value>,
    data: Option<serde_json::Value>,
}

impl ErrorResponse {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
            code,
            errors: None,
            data: None,
        }
    }
}

impl AppError {
    /// Código HTTP asociado al tipo de error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            AppError::Database(e) if is_unique_violation(e) => StatusCode::CONFLICT,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidState(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) | AppError::Hash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == "23505")
        .unwrap_or(false)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            AppError::Database(sqlx::Error::RowNotFound) => {
                warn!("Registro no encontrado");
                ErrorResponse::new("NOT_FOUND", "El recurso solicitado no existe")
            }

            AppError::Database(e) if is_unique_violation(&e) => {
                warn!("Violación de unicidad: {}", e);
                ErrorResponse::new("CONFLICT", "El recurso ya existe")
            }

            AppError::Database(e) => {
                error!("❌ Database error: {}", e);
                ErrorResponse::new(
                    "INTERNAL_ERROR",
                    "An error occurred while accessing the database",
                )
            }

            AppError::Validation(e) => {
                warn!("Validation error: {}", e);
                let mut body = ErrorResponse::new("VALIDATION_ERROR", "The provided data is invalid");
                body.errors = Some(json!(e));
                body
            }

            AppError::BadRequest(msg) => {
                warn!("Bad request: {}", msg);
                ErrorResponse::new("VALIDATION_ERROR", msg)
            }

            AppError::Unauthorized(msg) => {
                warn!("Unauthorized access: {}", msg);
                ErrorResponse::new("UNAUTHORIZED", msg)
            }

            AppError::Jwt(msg) => {
                warn!("JWT error: {}", msg);
                ErrorResponse::new("UNAUTHORIZED", msg)
            }

            AppError::Forbidden(msg) => {
                warn!("Forbidden access: {}", msg);
                ErrorResponse::new("PERMISSION_DENIED", msg)
            }

            AppError::NotFound(msg) => {
                warn!("Resource not found: {}", msg);
                ErrorResponse::new("NOT_FOUND", msg)
            }

            AppError::Conflict(msg) => {
                warn!("Conflict: {}", msg);
                ErrorResponse::new("CONFLICT", msg)
            }

            AppError::InvalidState(msg) => {
                warn!("Invalid state: {}", msg);
                ErrorResponse::new("INVALID_STATE", msg)
            }

            AppError::Internal(msg) => {
                error!("❌ Internal error: {}", msg);
                ErrorResponse::new("INTERNAL_ERROR", "An unexpected error occurred")
            }

            AppError::Hash(msg) => {
                error!("❌ Hash error: {}", msg);
                ErrorResponse::new(
                    "INTERNAL_ERROR",
                    "An error occurred while processing credentials",
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de validación
pub fn validation_error(field: &'static str, message: &'static str) -> AppError {
    use validator::ValidationError;

    let mut error = ValidationError::new("custom");
    error.message = Some(message.into());
    error.add_param("field".into(), &field);

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de conflicto
pub fn conflict_error(resource: &str, field: &str, value: &str) -> AppError {
    AppError::Conflict(format!("{} with {} '{}' already exists", resource, field, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_per_kind() {
        assert_eq!(AppError::BadRequest("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Forbidden("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::InvalidState("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Internal("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_validation_error_helper() {
        let err = validation_error("custom_interval", "required for custom frequency");
        match err {
            AppError::Validation(errors) => {
                assert!(errors.field_errors().contains_key("custom_interval"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_helpers_format_messages() {
        let err = not_found_error("Sale", "abc");
        assert_eq!(err.to_string(), "Not found: Sale with id 'abc' not found");

        let err = conflict_error("Vehicle", "registration_number", "BA 1 PA 1234");
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
