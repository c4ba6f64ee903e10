use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{company::Company, user::User};
use crate::utils::validation::validate_phone;

// Request para registrar una empresa con su primer administrador
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 255, message = "Company name must be 2-255 characters"))]
    pub company_name: String,
    pub company_address: Option<String>,
    #[validate(custom = "validate_phone")]
    pub company_phone: Option<String>,
    #[validate(length(min = 3, max = 100, message = "Username must be 3-100 characters"))]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 255))]
    pub full_name: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,
}

// Request de login: empresa + usuario + contraseña
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub company_name: String,
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub company: Company,
    pub user: User,
}
