use crate::models::user::User;
use crate::utils::errors::AppError;
use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Datos de un usuario nuevo con la contraseña ya hasheada
pub struct NewUser {
    pub company_id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_admin: bool,
}

/// Cambios de perfil ya resueltos
pub struct ProfileChanges {
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password_hash: String,
}

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(conn: &mut PgConnection, user: NewUser) -> Result<User, AppError> {
        let now = Utc::now();
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                id, company_id, username, password_hash, full_name,
                email, phone, is_admin, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user.company_id)
        .bind(user.username.trim())
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(user.is_admin)
        .bind(now)
        .fetch_one(conn)
        .await?;

        Ok(result)
    }

    /// Usuario no eliminado de la empresa indicada
    pub async fn find_active(&self, company_id: Uuid, id: Uuid) -> Result<Option<User>, AppError> {
        let result = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE id = $1 AND company_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    /// Resolver el usuario de login por nombre de empresa y usuario
    pub async fn find_for_login(
        &self,
        company_name: &str,
        username: &str,
    ) -> Result<Option<User>, AppError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            SELECT u.*
            FROM users u
            JOIN companies c ON c.id = u.company_id
            WHERE LOWER(c.name) = LOWER($1)
              AND u.username = $2
              AND u.deleted_at IS NULL
            "#,
        )
        .bind(company_name.trim())
        .bind(username.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn username_exists(&self, company_id: Uuid, username: &str) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM users WHERE company_id = $1 AND username = $2)",
        )
        .bind(company_id)
        .bind(username.trim())
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<User>, AppError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE company_id = $1 AND deleted_at IS NULL
            ORDER BY created_at ASC
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<User, AppError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET full_name = $2, email = $3, phone = $4, password_hash = $5, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.full_name)
        .bind(&changes.email)
        .bind(&changes.phone)
        .bind(&changes.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }
}
