use crate::utils::errors::AppError;
use sqlx::PgPool;

pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> Result<Vec<(String, bool)>, AppError> {
        let rows: Vec<(String, bool)> =
            sqlx::query_as("SELECT key, value FROM system_settings ORDER BY key")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows)
    }

    /// Escribir varias claves en una sola transacción
    pub async fn upsert_many(&self, entries: &[(&str, bool)]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        for (key, value) in entries {
            sqlx::query(
                r#"
                INSERT INTO system_settings (key, value, updated_at)
                VALUES ($1, $2, NOW())
                ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
                "#,
            )
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Ok(())
    }
}
