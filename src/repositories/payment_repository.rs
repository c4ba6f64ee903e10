use crate::models::payment::{Payment, PaymentState, PaymentType};
use crate::utils::errors::AppError;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgConnection;
use uuid::Uuid;

/// Pago nuevo; siempre nace `pending` y sin verificar
pub struct NewPayment<'a> {
    pub sale_id: Uuid,
    pub amount: Decimal,
    pub payment_type: PaymentType,
    pub payment_method: &'a str,
    pub remarks: Option<&'a str>,
}

pub struct PaymentRepository;

impl PaymentRepository {
    pub async fn insert(conn: &mut PgConnection, payment: NewPayment<'_>) -> Result<Payment, AppError> {
        let result = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (
                id, sale_id, amount, payment_type, payment_method, status,
                verified_by_admin, remarks, created_at
            )
            VALUES ($1, $2, $3, $4, $5, 'pending', FALSE, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(payment.sale_id)
        .bind(payment.amount)
        .bind(payment.payment_type)
        .bind(payment.payment_method.trim())
        .bind(payment.remarks)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;

        Ok(result)
    }

    pub async fn list_for_sale(conn: &mut PgConnection, sale_id: Uuid) -> Result<Vec<Payment>, AppError> {
        let result = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE sale_id = $1 ORDER BY created_at, id",
        )
        .bind(sale_id)
        .fetch_all(conn)
        .await?;

        Ok(result)
    }

    pub async fn lock(
        conn: &mut PgConnection,
        sale_id: Uuid,
        payment_id: Uuid,
    ) -> Result<Option<Payment>, AppError> {
        let result = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE id = $1 AND sale_id = $2 FOR UPDATE",
        )
        .bind(payment_id)
        .bind(sale_id)
        .fetch_optional(conn)
        .await?;

        Ok(result)
    }

    /// Resultado de la verificación de un administrador
    pub async fn mark_verified(
        conn: &mut PgConnection,
        payment_id: Uuid,
        state: PaymentState,
        verified_by: Uuid,
        remarks: Option<&str>,
    ) -> Result<Payment, AppError> {
        let result = sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments
            SET status = $2, verified_by_admin = TRUE, verified_by = $3,
                verified_at = NOW(), remarks = COALESCE($4, remarks)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(payment_id)
        .bind(state)
        .bind(verified_by)
        .bind(remarks)
        .fetch_one(conn)
        .await?;

        Ok(result)
    }

    pub async fn set_state(
        conn: &mut PgConnection,
        payment_id: Uuid,
        state: PaymentState,
    ) -> Result<Payment, AppError> {
        let result = sqlx::query_as::<_, Payment>(
            "UPDATE payments SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(payment_id)
        .bind(state)
        .fetch_one(conn)
        .await?;

        Ok(result)
    }
}
