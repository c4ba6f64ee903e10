//! Utilidades JWT
//!
//! Emisión y verificación de tokens con los claims `user_id`,
//! `company_id` y `username`.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::environment::EnvironmentConfig, utils::errors::AppError};

/// Claims del JWT token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub username: String,
    pub exp: usize, // expiration timestamp
    pub iat: usize, // issued at timestamp
}

/// Configuración de JWT
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration: u64,
}

impl From<&EnvironmentConfig> for JwtConfig {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            expiration: config.jwt_expiration,
        }
    }
}

/// Generar JWT token para un usuario
pub fn generate_token(
    user_id: Uuid,
    company_id: Uuid,
    username: &str,
    config: &JwtConfig,
) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::seconds(config.expiration as i64);

    let claims = JwtClaims {
        user_id,
        company_id,
        username: username.to_string(),
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let encoding_key = EncodingKey::from_secret(config.secret.as_ref());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::Internal(format!("Error generando token: {}", e)))
}

/// Verificar y decodificar JWT token
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<JwtClaims, AppError> {
    let decoding_key = DecodingKey::from_secret(config.secret.as_ref());

    let token_data = decode::<JwtClaims>(token, &decoding_key, &Validation::default())
        .map_err(|_| AppError::Jwt("Token inválido o expirado".to_string()))?;

    Ok(token_data.claims)
}

/// Extraer token del header Authorization
pub fn extract_token_from_header(auth_header: &str) -> Result<&str, AppError> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Jwt("Header Authorization debe comenzar con 'Bearer '".to_string()))?;

    if token.trim().is_empty() {
        return Err(AppError::Jwt("Token no puede estar vacío".to_string()));
    }

    Ok(token.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            expiration: 3600,
        }
    }

    #[test]
    fn test_generate_and_verify_token() {
        let config = test_config();
        let user_id = Uuid::new_v4();
        let company_id = Uuid::new_v4();

        let token = generate_token(user_id, company_id, "operador", &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.company_id, company_id);
        assert_eq!(claims.username, "operador");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token = generate_token(Uuid::new_v4(), Uuid::new_v4(), "x", &test_config()).unwrap();
        let other = JwtConfig {
            secret: "otro-secreto".to_string(),
            expiration: 3600,
        };
        assert!(matches!(verify_token(&token, &other), Err(AppError::Jwt(_))));
    }

    #[test]
    fn test_extract_token_from_header() {
        assert_eq!(extract_token_from_header("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(extract_token_from_header("Basic abc").is_err());
        assert!(extract_token_from_header("Bearer ").is_err());
    }
}
