use crate::models::company::Company;
use crate::utils::errors::AppError;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insertar dentro de la transacción de registro
    pub async fn create(conn: &mut PgConnection, company: &Company) -> Result<Company, AppError> {
        let result = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (id, name, address, phone, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(company.id)
        .bind(&company.name)
        .bind(&company.address)
        .bind(&company.phone)
        .bind(company.created_at)
        .fetch_one(conn)
        .await?;

        Ok(result)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, AppError> {
        let result = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }

    /// Búsqueda sin distinguir mayúsculas
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Company>, AppError> {
        let result = sqlx::query_as::<_, Company>(
            "SELECT * FROM companies WHERE LOWER(name) = LOWER($1)",
        )
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn name_exists(&self, name: &str) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM companies WHERE LOWER(name) = LOWER($1))",
        )
        .bind(name.trim())
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }
}
