//! Libro de pagos de una venta
//!
//! Una venta está pagada cuando la suma de pagos `completed` verificados
//! por un administrador, más una tolerancia de 0.01, alcanza el total.

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::models::payment::{Payment, PaymentState};
use crate::models::sale::PaymentStatus;
use crate::utils::errors::AppError;

/// Tolerancia para comparar importes
pub fn payment_epsilon() -> Decimal {
    Decimal::new(1, 2)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("only an admin can verify payments")]
    PermissionDenied,

    #[error("payment is {0:?}; only pending payments can change state")]
    NotPending(PaymentState),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::PermissionDenied => AppError::Forbidden(err.to_string()),
            LedgerError::NotPending(_) => AppError::InvalidState(err.to_string()),
        }
    }
}

/// Resultado de una verificación de administrador
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationDecision {
    Completed,
    Failed,
}

impl From<VerificationDecision> for PaymentState {
    fn from(decision: VerificationDecision) -> Self {
        match decision {
            VerificationDecision::Completed => PaymentState::Completed,
            VerificationDecision::Failed => PaymentState::Failed,
        }
    }
}

/// Suma de los pagos que cuentan para el total
pub fn verified_total(payments: &[Payment]) -> Decimal {
    payments
        .iter()
        .filter(|p| p.counts_toward_total())
        .map(|p| p.amount)
        .sum()
}

/// `total_paid + 0.01 >= total_amount`
pub fn is_paid(total_paid: Decimal, total_amount: Decimal) -> bool {
    total_paid + payment_epsilon() >= total_amount
}

/// Estado de pago derivado del total verificado
pub fn derive_payment_status(total_paid: Decimal, total_amount: Decimal) -> PaymentStatus {
    if is_paid(total_paid, total_amount) {
        PaymentStatus::Paid
    } else if total_paid > Decimal::ZERO {
        PaymentStatus::Partial
    } else {
        PaymentStatus::Unpaid
    }
}

/// Estado de pago de una venta a partir de todos sus pagos
pub fn settle(payments: &[Payment], total_amount: Decimal) -> PaymentStatus {
    derive_payment_status(verified_total(payments), total_amount)
}

/// Verificación de un pago pendiente; sólo administradores
pub fn verify(
    payment: &Payment,
    is_admin: bool,
    decision: VerificationDecision,
) -> Result<PaymentState, LedgerError> {
    if !is_admin {
        return Err(LedgerError::PermissionDenied);
    }
    if payment.status != PaymentState::Pending {
        return Err(LedgerError::NotPending(payment.status));
    }
    Ok(decision.into())
}

/// Cancelación de un pago pendiente
pub fn cancel(payment: &Payment) -> Result<PaymentState, LedgerError> {
    if payment.status != PaymentState::Pending {
        return Err(LedgerError::NotPending(payment.status));
    }
    Ok(PaymentState::Cancelled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::payment::PaymentType;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn payment(amount: Decimal, status: PaymentState, verified_by_admin: bool) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            sale_id: Uuid::new_v4(),
            amount,
            payment_type: PaymentType::Booking,
            payment_method: "cash".to_string(),
            status,
            verified_by_admin,
            verified_by: None,
            verified_at: None,
            remarks: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_only_verified_completed_payments_count() {
        let payments = vec![
            payment(dec!(1000), PaymentState::Completed, true),
            payment(dec!(500), PaymentState::Completed, false),
            payment(dec!(300), PaymentState::Pending, false),
            payment(dec!(200), PaymentState::Failed, true),
            payment(dec!(100), PaymentState::Cancelled, false),
        ];
        assert_eq!(verified_total(&payments), dec!(1000));
        assert_eq!(settle(&payments, dec!(2100)), PaymentStatus::Partial);
    }

    #[test]
    fn test_paid_threshold_uses_epsilon() {
        assert!(is_paid(dec!(2100), dec!(2100)));
        assert!(is_paid(dec!(2099.99), dec!(2100)));
        assert!(!is_paid(dec!(2099.98), dec!(2100)));
        assert!(is_paid(dec!(2500), dec!(2100)));
    }

    #[test]
    fn test_never_paid_with_fewer_funds() {
        let total = dec!(1999.99);
        let mut paid = Decimal::ZERO;
        while paid + dec!(0.01) < total {
            assert_ne!(derive_payment_status(paid, total), PaymentStatus::Paid);
            paid += dec!(37.03);
        }
    }

    #[test]
    fn test_derive_payment_status() {
        assert_eq!(derive_payment_status(dec!(0), dec!(100)), PaymentStatus::Unpaid);
        assert_eq!(derive_payment_status(dec!(40), dec!(100)), PaymentStatus::Partial);
        assert_eq!(derive_payment_status(dec!(100), dec!(100)), PaymentStatus::Paid);
    }

    #[test]
    fn test_verifying_full_payment_settles_sale() {
        let mut pending = payment(dec!(2100), PaymentState::Pending, false);
        let new_state = verify(&pending, true, VerificationDecision::Completed).unwrap();
        pending.status = new_state;
        pending.verified_by_admin = true;

        assert_eq!(settle(&[pending], dec!(2100)), PaymentStatus::Paid);
    }

    #[test]
    fn test_non_admin_cannot_verify() {
        let pending = payment(dec!(100), PaymentState::Pending, false);
        assert_eq!(
            verify(&pending, false, VerificationDecision::Completed),
            Err(LedgerError::PermissionDenied)
        );
        assert!(matches!(
            AppError::from(LedgerError::PermissionDenied),
            AppError::Forbidden(_)
        ));
    }

    #[test]
    fn test_only_pending_payments_can_be_verified() {
        let done = payment(dec!(100), PaymentState::Completed, true);
        assert_eq!(
            verify(&done, true, VerificationDecision::Failed),
            Err(LedgerError::NotPending(PaymentState::Completed))
        );

        let failed = payment(dec!(100), PaymentState::Pending, false);
        assert_eq!(
            verify(&failed, true, VerificationDecision::Failed),
            Ok(PaymentState::Failed)
        );
    }

    #[test]
    fn test_cancel_only_pending() {
        let mut p = payment(dec!(100), PaymentState::Pending, false);
        p.status = cancel(&p).unwrap();
        assert_eq!(p.status, PaymentState::Cancelled);

        // Cancelar dos veces falla
        let err = cancel(&p).unwrap_err();
        assert_eq!(err, LedgerError::NotPending(PaymentState::Cancelled));
        assert!(matches!(AppError::from(err), AppError::InvalidState(_)));

        let completed = payment(dec!(100), PaymentState::Completed, true);
        assert!(cancel(&completed).is_err());
    }
}
