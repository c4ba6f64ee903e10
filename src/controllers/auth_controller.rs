use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::PgPool;
use tracing::{info, warn};
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::auth_dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::models::company::Company;
use crate::repositories::company_repository::CompanyRepository;
use crate::repositories::user_repository::{NewUser, UserRepository};
use crate::services::settings::SystemSettings;
use crate::utils::errors::{conflict_error, AppError};
use crate::utils::jwt::{generate_token, JwtConfig};

pub struct AuthController {
    pool: PgPool,
    companies: CompanyRepository,
    users: UserRepository,
}

impl AuthController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            companies: CompanyRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            pool,
        }
    }

    /// Registrar una empresa con su primer usuario administrador
    pub async fn register(
        &self,
        settings: &SystemSettings,
        request: RegisterRequest,
    ) -> Result<ApiResponse<RegisterResponse>, AppError> {
        settings.ensure_registration_enabled()?;
        request.validate()?;

        let company_name = request.company_name.trim().to_string();

        // Verificar que la empresa no exista
        if self.companies.name_exists(&company_name).await? {
            return Err(conflict_error("Company", "name", &company_name));
        }

        // Hash de la contraseña
        let password_hash = hash(&request.password, DEFAULT_COST)
            .map_err(|e| AppError::Hash(format!("Error hashing password: {}", e)))?;

        let mut tx = self.pool.begin().await?;
        let company = CompanyRepository::create(
            &mut tx,
            &Company::new(company_name, request.company_address, request.company_phone),
        )
        .await?;
        let user = UserRepository::create(
            &mut tx,
            NewUser {
                company_id: company.id,
                username: request.username,
                password_hash,
                full_name: request.full_name,
                email: request.email,
                phone: request.phone,
                is_admin: true,
            },
        )
        .await?;
        tx.commit().await?;

        info!("🏢 Empresa {} registrada con el administrador {}", company.name, user.username);

        Ok(ApiResponse::success_with_message(
            RegisterResponse { company, user },
            "Company registered successfully",
        ))
    }

    pub async fn login(
        &self,
        settings: &SystemSettings,
        jwt: &JwtConfig,
        request: LoginRequest,
    ) -> Result<ApiResponse<LoginResponse>, AppError> {
        settings.ensure_login_enabled()?;
        request.validate()?;

        let user = self
            .users
            .find_for_login(request.company_name.trim(), request.username.trim())
            .await?
            .ok_or_else(invalid_credentials)?;

        // Verificar contraseña
        let valid = verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Hash(format!("Error verifying password: {}", e)))?;
        if !valid {
            warn!("🔒 Contraseña incorrecta para {}", user.username);
            return Err(invalid_credentials());
        }

        let token = generate_token(user.id, user.company_id, &user.username, jwt)?;
        info!("🔑 Login de {} en la empresa {}", user.username, user.company_id);

        Ok(ApiResponse::success_with_message(
            LoginResponse {
                token,
                token_type: "Bearer",
                expires_in: jwt.expiration,
                user,
            },
            "Login successful",
        ))
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".to_string())
}
