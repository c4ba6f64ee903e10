use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::payment_dto::{CreatePaymentRequest, PaymentSummary, VerifyPaymentRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::payment::Payment;
use crate::models::sale::{Sale, SaleStatus};
use crate::repositories::payment_repository::{NewPayment, PaymentRepository};
use crate::repositories::sale_repository::SaleRepository;
use crate::services::payment_ledger::{self, settle, verified_total};
use crate::utils::errors::{not_found_error, AppError};

pub struct PaymentController {
    pool: PgPool,
}

impl PaymentController {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        sale_id: Uuid,
        request: CreatePaymentRequest,
    ) -> Result<ApiResponse<Payment>, AppError> {
        request.validate()?;

        let mut tx = self.pool.begin().await?;
        let sale = SaleRepository::lock(&mut tx, user.company_id, sale_id)
            .await?
            .ok_or_else(|| not_found_error("Sale", &sale_id.to_string()))?;

        if sale.status == SaleStatus::Cancelled {
            return Err(AppError::InvalidState(
                "Payments cannot be added to a cancelled sale".to_string(),
            ));
        }

        let payment = PaymentRepository::insert(
            &mut tx,
            NewPayment {
                sale_id: sale.id,
                amount: request.amount,
                payment_type: request.payment_type,
                payment_method: &request.payment_method,
                remarks: request.remarks.as_deref(),
            },
        )
        .await?;
        tx.commit().await?;

        info!("💰 Pago {} de {} registrado en la venta {}", payment.id, payment.amount, sale_id);

        Ok(ApiResponse::success_with_message(payment, "Payment recorded, pending verification"))
    }

    pub async fn list(
        &self,
        user: &AuthenticatedUser,
        sale_id: Uuid,
    ) -> Result<ApiResponse<PaymentSummary>, AppError> {
        let sale = SaleRepository::new(self.pool.clone())
            .find_by_id(user.company_id, sale_id)
            .await?
            .ok_or_else(|| not_found_error("Sale", &sale_id.to_string()))?;

        let mut conn = self.pool.acquire().await?;
        let payments = PaymentRepository::list_for_sale(&mut conn, sale.id).await?;

        Ok(ApiResponse::success(summarize(&sale, payments)))
    }

    /// Verificación de administrador y recálculo del estado de pago, en una transacción
    pub async fn verify(
        &self,
        user: &AuthenticatedUser,
        sale_id: Uuid,
        payment_id: Uuid,
        request: VerifyPaymentRequest,
    ) -> Result<ApiResponse<PaymentSummary>, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut sale = SaleRepository::lock(&mut tx, user.company_id, sale_id)
            .await?
            .ok_or_else(|| not_found_error("Sale", &sale_id.to_string()))?;
        let payment = PaymentRepository::lock(&mut tx, sale.id, payment_id)
            .await?
            .ok_or_else(|| not_found_error("Payment", &payment_id.to_string()))?;

        let new_state = payment_ledger::verify(&payment, user.is_admin, request.status)?;
        PaymentRepository::mark_verified(
            &mut tx,
            payment.id,
            new_state,
            user.user_id,
            request.remarks.as_deref(),
        )
        .await?;

        let payments = PaymentRepository::list_for_sale(&mut tx, sale.id).await?;
        sale.payment_status = settle(&payments, sale.total_amount);
        let sale = SaleRepository::update(&mut tx, &sale).await?;
        tx.commit().await?;

        info!(
            "✅ Pago {} verificado como {:?} por {}; venta {} ahora {:?}",
            payment_id, new_state, user.username, sale_id, sale.payment_status
        );

        Ok(ApiResponse::success_with_message(
            summarize(&sale, payments),
            "Payment verified",
        ))
    }

    pub async fn cancel(
        &self,
        user: &AuthenticatedUser,
        sale_id: Uuid,
        payment_id: Uuid,
    ) -> Result<ApiResponse<Payment>, AppError> {
        user.require_admin("cancel payments")?;

        let mut tx = self.pool.begin().await?;

        let sale = SaleRepository::lock(&mut tx, user.company_id, sale_id)
            .await?
            .ok_or_else(|| not_found_error("Sale", &sale_id.to_string()))?;
        let payment = PaymentRepository::lock(&mut tx, sale.id, payment_id)
            .await?
            .ok_or_else(|| not_found_error("Payment", &payment_id.to_string()))?;

        let new_state = payment_ledger::cancel(&payment)?;
        let payment = PaymentRepository::set_state(&mut tx, payment.id, new_state).await?;
        tx.commit().await?;

        info!("🚫 Pago {} cancelado en la venta {}", payment_id, sale_id);

        Ok(ApiResponse::success_with_message(payment, "Payment cancelled"))
    }
}

fn summarize(sale: &Sale, payments: Vec<Payment>) -> PaymentSummary {
    let total_paid = verified_total(&payments);
    PaymentSummary {
        total_amount: sale.total_amount,
        total_paid,
        balance: (sale.total_amount - total_paid).max(Decimal::ZERO),
        payment_status: sale.payment_status,
        payments,
    }
}
