//! Perfil propio y usuarios de la empresa

use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::user_dto::{CreateUserRequest, UpdateProfileRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::User;
use crate::repositories::user_repository::{NewUser, ProfileChanges, UserRepository};
use crate::utils::errors::{conflict_error, not_found_error, AppError};

pub struct UserController {
    pool: PgPool,
    repository: UserRepository,
}

impl UserController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UserRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn profile(&self, user: &AuthenticatedUser) -> Result<ApiResponse<User>, AppError> {
        let profile = self.current(user).await?;
        Ok(ApiResponse::success(profile))
    }

    /// Cambiar la contraseña exige la contraseña actual
    pub async fn update_profile(
        &self,
        user: &AuthenticatedUser,
        request: UpdateProfileRequest,
    ) -> Result<ApiResponse<User>, AppError> {
        request.validate()?;
        let current = self.current(user).await?;

        let password_hash = match request.new_password {
            Some(new_password) => {
                let Some(current_password) = request.current_password else {
                    return Err(AppError::BadRequest(
                        "current_password is required to change the password".to_string(),
                    ));
                };
                let valid = verify(&current_password, &current.password_hash)
                    .map_err(|e| AppError::Hash(format!("Error verifying password: {}", e)))?;
                if !valid {
                    return Err(AppError::Unauthorized("Current password is incorrect".to_string()));
                }
                hash(&new_password, DEFAULT_COST)
                    .map_err(|e| AppError::Hash(format!("Error hashing password: {}", e)))?
            }
            None => current.password_hash,
        };

        let changes = ProfileChanges {
            full_name: request.full_name.unwrap_or(current.full_name),
            email: request.email.or(current.email),
            phone: request.phone.or(current.phone),
            password_hash,
        };

        let updated = self.repository.update_profile(current.id, changes).await?;
        info!("👤 Perfil de {} actualizado", updated.username);

        Ok(ApiResponse::success_with_message(updated, "Profile updated"))
    }

    pub async fn create_user(
        &self,
        user: &AuthenticatedUser,
        request: CreateUserRequest,
    ) -> Result<ApiResponse<User>, AppError> {
        user.require_admin("create users")?;
        request.validate()?;

        let username = request.username.trim().to_string();
        if self.repository.username_exists(user.company_id, &username).await? {
            return Err(conflict_error("User", "username", &username));
        }

        let password_hash = hash(&request.password, DEFAULT_COST)
            .map_err(|e| AppError::Hash(format!("Error hashing password: {}", e)))?;

        let mut conn = self.pool.acquire().await?;
        let created = UserRepository::create(
            &mut conn,
            NewUser {
                company_id: user.company_id,
                username,
                password_hash,
                full_name: request.full_name,
                email: request.email,
                phone: request.phone,
                is_admin: request.is_admin,
            },
        )
        .await?;

        info!("👤 Usuario {} creado por {}", created.username, user.username);

        Ok(ApiResponse::success_with_message(created, "User created"))
    }

    pub async fn list_users(&self, user: &AuthenticatedUser) -> Result<ApiResponse<Vec<User>>, AppError> {
        let users = self.repository.list_by_company(user.company_id).await?;
        Ok(ApiResponse::success(users))
    }

    async fn current(&self, user: &AuthenticatedUser) -> Result<User, AppError> {
        self.repository
            .find_active(user.company_id, user.user_id)
            .await?
            .ok_or_else(|| not_found_error("User", &user.user_id.to_string()))
    }
}
