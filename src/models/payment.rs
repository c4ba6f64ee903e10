//! Modelo de Payment
//!
//! Un evento de pago asociado a una venta. Sólo los pagos `completed`
//! verificados por un administrador cuentan para el total pagado.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Momento del alquiler en que se cobra - mapea al ENUM payment_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "payment_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Booking,
    Delivery,
    Return,
}

/// Estado del pago - mapea al ENUM payment_state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "payment_state", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

/// Payment - mapea exactamente a la tabla payments
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub amount: Decimal,
    pub payment_type: PaymentType,
    pub payment_method: String,
    pub status: PaymentState,
    pub verified_by_admin: bool,
    pub verified_by: Option<Uuid>,
    pub verified_at: Option<DateTime<Utc>>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Cuenta para el total pagado de la venta
    pub fn counts_toward_total(&self) -> bool {
        self.status == PaymentState::Completed && self.verified_by_admin
    }
}
