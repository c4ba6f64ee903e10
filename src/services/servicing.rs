//! Mantenimiento por kilometraje
//!
//! El historial de servicio es de sólo inserción: cada cambio del estado
//! produce una nueva fila en `vehicle_servicings`.

use rust_decimal::Decimal;

use crate::models::vehicle::VehicleServicing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServicingState {
    pub last_servicing_km: Decimal,
    pub next_servicing_km: Decimal,
    pub interval_km: Decimal,
    pub is_due: bool,
}

impl From<&VehicleServicing> for ServicingState {
    fn from(row: &VehicleServicing) -> Self {
        Self {
            last_servicing_km: row.last_servicing_km,
            next_servicing_km: row.next_servicing_km,
            interval_km: row.interval_km,
            is_due: row.is_due,
        }
    }
}

/// Primer estado a partir del odómetro actual
pub fn configure(odometer: Decimal, interval_km: Decimal) -> ServicingState {
    ServicingState {
        last_servicing_km: odometer,
        next_servicing_km: odometer + interval_km,
        interval_km,
        is_due: false,
    }
}

/// Nuevo estado sólo si el indicador de vencimiento cambia
pub fn evaluate(state: &ServicingState, odometer: Decimal) -> Option<ServicingState> {
    let is_due = odometer >= state.next_servicing_km;
    (is_due != state.is_due).then_some(ServicingState { is_due, ..*state })
}

/// Servicio realizado en `odometer`
pub fn mark_serviced(state: &ServicingState, odometer: Decimal) -> ServicingState {
    configure(odometer, state.interval_km)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_configure() {
        let state = configure(dec!(12000), dec!(5000));
        assert_eq!(state.next_servicing_km, dec!(17000));
        assert!(!state.is_due);
    }

    #[test]
    fn test_evaluate_only_reports_changes() {
        let state = configure(dec!(12000), dec!(5000));
        assert_eq!(evaluate(&state, dec!(16999.9)), None);

        let due = evaluate(&state, dec!(17000)).unwrap();
        assert!(due.is_due);
        assert_eq!(due.next_servicing_km, dec!(17000));

        // Ya vencido: sin cambio
        assert_eq!(evaluate(&due, dec!(17500)), None);
    }

    #[test]
    fn test_mark_serviced_resets_due_flag() {
        let due = ServicingState {
            last_servicing_km: dec!(12000),
            next_servicing_km: dec!(17000),
            interval_km: dec!(5000),
            is_due: true,
        };
        let serviced = mark_serviced(&due, dec!(17250));
        assert_eq!(serviced.last_servicing_km, dec!(17250));
        assert_eq!(serviced.next_servicing_km, dec!(22250));
        assert!(!serviced.is_due);
    }
}
