use crate::services::availability::DateRange;
use crate::services::revenue::RecognizeAt;
use crate::utils::errors::AppError;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

pub struct RevenueRepository {
    pool: PgPool,
}

impl RevenueRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Ingresos del rango y número de ventas que los generan
    pub async fn revenue(
        &self,
        company_id: Uuid,
        window: &DateRange,
        recognize_at: RecognizeAt,
    ) -> Result<(Decimal, i64), AppError> {
        let sql = match recognize_at {
            RecognizeAt::Payment => {
                r#"
                SELECT COALESCE(SUM(p.amount), 0), COUNT(DISTINCT p.sale_id)
                FROM payments p
                JOIN sales s ON s.id = p.sale_id
                WHERE s.company_id = $1
                  AND p.status = 'completed'
                  AND p.verified_by_admin
                  AND (p.verified_at AT TIME ZONE 'UTC')::date BETWEEN $2 AND $3
                "#
            }
            RecognizeAt::Booking => {
                r#"
                SELECT COALESCE(SUM(total_amount), 0), COUNT(*)
                FROM sales
                WHERE company_id = $1
                  AND status <> 'cancelled'
                  AND booking_date BETWEEN $2 AND $3
                "#
            }
            RecognizeAt::Return => {
                r#"
                SELECT COALESCE(SUM(total_amount), 0), COUNT(*)
                FROM sales
                WHERE company_id = $1
                  AND status = 'completed'
                  AND actual_return_date BETWEEN $2 AND $3
                "#
            }
        };

        let row: (Decimal, i64) = sqlx::query_as(sql)
            .bind(company_id)
            .bind(window.start)
            .bind(window.end)
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn expenses(&self, company_id: Uuid, window: &DateRange) -> Result<Decimal, AppError> {
        let (total,): (Decimal,) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM expenses
            WHERE company_id = $1 AND expense_date BETWEEN $2 AND $3
            "#,
        )
        .bind(company_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}
