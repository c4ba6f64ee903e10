//! Middleware de autenticación JWT
//!
//! Este módulo maneja la autenticación JWT, extracción de tokens
//! y verificación de usuarios autenticados.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
    Extension,
};
use uuid::Uuid;

use crate::{
    repositories::user_repository::UserRepository,
    state::AppState,
    utils::{
        errors::AppError,
        jwt::{extract_token_from_header, verify_token},
    },
};

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub username: String,
    pub is_admin: bool,
}

impl AuthenticatedUser {
    /// Exigir privilegios de administrador para una operación
    pub fn require_admin(&self, operation: &str) -> Result<(), AppError> {
        if !self.is_admin {
            return Err(AppError::Forbidden(format!(
                "Admin privileges are required to {}",
                operation
            )));
        }
        Ok(())
    }
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extraer token del header Authorization
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    let token = extract_token_from_header(auth_header)?;
    let claims = verify_token(token, &state.jwt_config())?;

    // Verificar que el usuario existe y no está eliminado
    let user = UserRepository::new(state.pool.clone())
        .find_active(claims.company_id, claims.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Usuario no encontrado".to_string()))?;

    let authenticated_user = AuthenticatedUser {
        user_id: user.id,
        company_id: user.company_id,
        username: user.username,
        is_admin: user.is_admin,
    };

    tracing::debug!(
        "🔐 Usuario autenticado: {} (empresa {})",
        authenticated_user.username,
        authenticated_user.company_id
    );

    // Inyectar usuario autenticado en las extensions
    request.extensions_mut().insert(authenticated_user);

    Ok(next.run(request).await)
}

/// Middleware para verificar permisos de admin
pub async fn admin_only_middleware(
    Extension(user): Extension<AuthenticatedUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    user.require_admin("access this resource")?;

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(is_admin: bool) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            username: "staff".to_string(),
            is_admin,
        }
    }

    #[test]
    fn test_require_admin() {
        assert!(user(true).require_admin("verify payments").is_ok());
        let err = user(false).require_admin("verify payments").unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(
            err.to_string(),
            "Forbidden: Admin privileges are required to verify payments"
        );
    }
}
