//! Máquina de estados de la venta
//!
//! `pending → active → completed`; `cancelled` desde `pending` o `active`.
//! Los estados `completed` y `cancelled` son terminales.

use thiserror::Error;

use crate::models::sale::SaleStatus;
use crate::utils::errors::AppError;

/// Eventos que mueven una venta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleEvent {
    Deliver,
    Return,
    Cancel,
}

impl SaleEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleEvent::Deliver => "deliver",
            SaleEvent::Return => "return",
            SaleEvent::Cancel => "cancel",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("cannot {} a sale that is {}", .event.as_str(), .from.as_str())]
    InvalidTransition { from: SaleStatus, event: SaleEvent },

    #[error("sale is {}; only pending or active sales can be edited", .0.as_str())]
    NotEditable(SaleStatus),
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        AppError::InvalidState(err.to_string())
    }
}

impl SaleStatus {
    /// Aplicar un evento; cualquier transición no listada es inválida
    pub fn apply(self, event: SaleEvent) -> Result<SaleStatus, LifecycleError> {
        match (self, event) {
            (SaleStatus::Pending, SaleEvent::Deliver) => Ok(SaleStatus::Active),
            (SaleStatus::Active, SaleEvent::Return) => Ok(SaleStatus::Completed),
            (SaleStatus::Pending | SaleStatus::Active, SaleEvent::Cancel) => {
                Ok(SaleStatus::Cancelled)
            }
            (from, event) => Err(LifecycleError::InvalidTransition { from, event }),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SaleStatus::Completed | SaleStatus::Cancelled)
    }
}

/// Sólo las ventas abiertas admiten edición
pub fn ensure_editable(status: SaleStatus) -> Result<(), LifecycleError> {
    if status.is_terminal() {
        return Err(LifecycleError::NotEditable(status));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let status = SaleStatus::Pending;
        let status = status.apply(SaleEvent::Deliver).unwrap();
        assert_eq!(status, SaleStatus::Active);
        let status = status.apply(SaleEvent::Return).unwrap();
        assert_eq!(status, SaleStatus::Completed);
        assert!(status.is_terminal());
    }

    #[test]
    fn test_cancel_from_open_states() {
        assert_eq!(SaleStatus::Pending.apply(SaleEvent::Cancel), Ok(SaleStatus::Cancelled));
        assert_eq!(SaleStatus::Active.apply(SaleEvent::Cancel), Ok(SaleStatus::Cancelled));
    }

    #[test]
    fn test_double_cancel_fails() {
        let cancelled = SaleStatus::Pending.apply(SaleEvent::Cancel).unwrap();
        let err = cancelled.apply(SaleEvent::Cancel).unwrap_err();
        assert_eq!(
            err,
            LifecycleError::InvalidTransition {
                from: SaleStatus::Cancelled,
                event: SaleEvent::Cancel
            }
        );
        assert!(matches!(AppError::from(err), AppError::InvalidState(_)));
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(SaleStatus::Pending.apply(SaleEvent::Return).is_err());
        assert!(SaleStatus::Active.apply(SaleEvent::Deliver).is_err());
        assert!(SaleStatus::Completed.apply(SaleEvent::Cancel).is_err());
        assert!(SaleStatus::Completed.apply(SaleEvent::Deliver).is_err());
        assert!(SaleStatus::Cancelled.apply(SaleEvent::Return).is_err());
    }

    #[test]
    fn test_error_message() {
        let err = SaleStatus::Completed.apply(SaleEvent::Cancel).unwrap_err();
        assert_eq!(err.to_string(), "cannot cancel a sale that is completed");
    }

    #[test]
    fn test_ensure_editable() {
        assert!(ensure_editable(SaleStatus::Pending).is_ok());
        assert!(ensure_editable(SaleStatus::Active).is_ok());
        assert_eq!(
            ensure_editable(SaleStatus::Completed),
            Err(LifecycleError::NotEditable(SaleStatus::Completed))
        );
    }
}
