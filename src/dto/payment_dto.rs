use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::payment::{Payment, PaymentType};
use crate::models::sale::PaymentStatus;
use crate::services::payment_ledger::VerificationDecision;
use crate::utils::validation::validate_positive_amount;

// Request para registrar un pago sobre una venta
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePaymentRequest {
    #[validate(custom = "validate_positive_amount")]
    pub amount: Decimal,
    pub payment_type: PaymentType,
    #[validate(length(min = 1, max = 50))]
    pub payment_method: String,
    pub remarks: Option<String>,
}

// Request de verificación de administrador
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub status: VerificationDecision,
    pub remarks: Option<String>,
}

// Response del libro de pagos de una venta
#[derive(Debug, Serialize)]
pub struct PaymentSummary {
    pub payments: Vec<Payment>,
    pub total_amount: Decimal,
    pub total_paid: Decimal,
    pub balance: Decimal,
    pub payment_status: PaymentStatus,
}
