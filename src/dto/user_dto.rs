use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::validate_phone;

// Request para que un admin cree un usuario de su empresa
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
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
    #[serde(default)]
    pub is_admin: bool,
}

// Request para actualizar el perfil propio
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 255))]
    pub full_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,
    pub current_password: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: Option<String>,
}
