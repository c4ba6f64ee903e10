//! Cálculo de días de alquiler
//!
//! Convierte las fechas (y horas opcionales) de entrega y devolución en
//! días completos y medios días facturables. Las marcas de tiempo se comparan
//! tal como están almacenadas, sin conversión de zona horaria.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::models::sale::ChargeType;
use crate::utils::errors::AppError;

/// Errores del cálculo de precios
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("return date must not be before the delivery date")]
    ReturnBeforeDelivery,

    #[error("charge per day must be greater than zero")]
    NonPositiveRate,

    #[error("{0:?} charge amount must be greater than zero")]
    NonPositiveCharge(ChargeType),

    #[error("discounts and credits exceed the amount payable")]
    NegativeTotal,
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Política de facturación de medios días
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentalPolicy {
    /// Un resto de hasta estas horas tras el último día completo se cobra como medio día
    pub half_day_threshold_hours: u32,
}

impl RentalPolicy {
    pub fn new(half_day_threshold_hours: u32) -> Option<Self> {
        (1..24)
            .contains(&half_day_threshold_hours)
            .then_some(Self { half_day_threshold_hours })
    }
}

impl Default for RentalPolicy {
    fn default() -> Self {
        Self { half_day_threshold_hours: 6 }
    }
}

/// Días facturables de un alquiler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RentalPeriod {
    pub full_days: i32,
    pub half_days: i32,
}

impl RentalPeriod {
    /// Calcular los días completos y medios días entre entrega y devolución.
    ///
    /// Sin horas, cuenta los días de calendario entre ambas fechas. Con ambas
    /// horas, divide el tiempo transcurrido en bloques de 24 h: un resto menor
    /// o igual al umbral de la política es medio día, un resto mayor es otro
    /// día completo. Nunca devuelve menos de un día completo.
    pub fn calculate(
        delivery_date: NaiveDate,
        delivery_time: Option<NaiveTime>,
        return_date: NaiveDate,
        return_time: Option<NaiveTime>,
        policy: &RentalPolicy,
    ) -> Result<Self, PricingError> {
        if return_date < delivery_date {
            return Err(PricingError::ReturnBeforeDelivery);
        }

        let (mut full_days, mut half_days) = match (delivery_time, return_time) {
            (Some(out_time), Some(in_time)) => {
                let delivered = delivery_date.and_time(out_time);
                let returned = return_date.and_time(in_time);
                if returned < delivered {
                    return Err(PricingError::ReturnBeforeDelivery);
                }

                let elapsed = returned - delivered;
                let whole_days = elapsed.num_days();
                let remainder = elapsed - Duration::days(whole_days);

                if remainder <= Duration::zero() {
                    (whole_days, 0)
                } else if remainder <= Duration::hours(policy.half_day_threshold_hours as i64) {
                    (whole_days, 1)
                } else {
                    (whole_days + 1, 0)
                }
            }
            _ => ((return_date - delivery_date).num_days(), 0),
        };

        // Sin alquileres gratuitos en el mismo día
        if full_days == 0 {
            full_days = 1;
            half_days = 0;
        }

        Ok(Self {
            full_days: full_days as i32,
            half_days,
        })
    }

    /// `full_days + 0.5 * half_days`
    pub fn number_of_days(&self) -> Decimal {
        Decimal::from(self.full_days) + Decimal::from(self.half_days) * half_day_factor()
    }
}

/// Ventana facturable de una devolución
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReturnWindow {
    pub return_date: NaiveDate,
    pub return_time: Option<NaiveTime>,
    pub period: RentalPeriod,
}

/// Resolver la devolución de una venta.
///
/// El inicio es la entrega real (con su hora) o, si no la hay, la fecha y
/// hora previstas. Sin fecha de devolución se toma `now`; una fecha sin hora
/// cuenta días de calendario.
pub fn return_window(
    actual_delivery: Option<DateTime<Utc>>,
    planned_delivery: (NaiveDate, Option<NaiveTime>),
    actual_return: (Option<NaiveDate>, Option<NaiveTime>),
    now: DateTime<Utc>,
    policy: &RentalPolicy,
) -> Result<ReturnWindow, PricingError> {
    let (delivery_date, delivery_time) = match actual_delivery {
        Some(delivered) => (delivered.date_naive(), Some(delivered.time())),
        None => planned_delivery,
    };
    let (return_date, return_time) = match actual_return {
        (Some(date), time) => (date, time),
        (None, time) => (now.date_naive(), Some(time.unwrap_or_else(|| now.time()))),
    };

    let period = RentalPeriod::calculate(delivery_date, delivery_time, return_date, return_time, policy)?;
    Ok(ReturnWindow {
        return_date,
        return_time,
        period,
    })
}

/// Multiplicador del medio día sobre la tarifa diaria
pub fn half_day_factor() -> Decimal {
    Decimal::new(5, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    #[test]
    fn test_calendar_days_without_times() {
        let period = RentalPeriod::calculate(
            date("2024-03-01"),
            None,
            date("2024-03-04"),
            None,
            &RentalPolicy::default(),
        )
        .unwrap();
        assert_eq!(period, RentalPeriod { full_days: 3, half_days: 0 });
        assert_eq!(period.number_of_days(), dec!(3));
    }

    #[test]
    fn test_short_remainder_is_half_day() {
        let period = RentalPeriod::calculate(
            date("2024-03-01"),
            Some(time("10:00")),
            date("2024-03-04"),
            Some(time("14:00")),
            &RentalPolicy::default(),
        )
        .unwrap();
        assert_eq!(period, RentalPeriod { full_days: 3, half_days: 1 });
        assert_eq!(period.number_of_days(), dec!(3.5));
    }

    #[test]
    fn test_remainder_exactly_at_threshold_is_half_day() {
        let period = RentalPeriod::calculate(
            date("2024-03-01"),
            Some(time("08:00")),
            date("2024-03-02"),
            Some(time("14:00")),
            &RentalPolicy::default(),
        )
        .unwrap();
        assert_eq!(period, RentalPeriod { full_days: 1, half_days: 1 });
    }

    #[test]
    fn test_long_remainder_is_full_day() {
        let period = RentalPeriod::calculate(
            date("2024-03-01"),
            Some(time("10:00")),
            date("2024-03-04"),
            Some(time("18:30")),
            &RentalPolicy::default(),
        )
        .unwrap();
        assert_eq!(period, RentalPeriod { full_days: 4, half_days: 0 });
    }

    #[test]
    fn test_threshold_follows_policy() {
        let policy = RentalPolicy::new(9).unwrap();
        let period = RentalPeriod::calculate(
            date("2024-03-01"),
            Some(time("10:00")),
            date("2024-03-04"),
            Some(time("18:30")),
            &policy,
        )
        .unwrap();
        assert_eq!(period, RentalPeriod { full_days: 3, half_days: 1 });
    }

    #[test]
    fn test_same_day_is_one_full_day() {
        let period = RentalPeriod::calculate(
            date("2024-03-01"),
            Some(time("09:00")),
            date("2024-03-01"),
            Some(time("11:00")),
            &RentalPolicy::default(),
        )
        .unwrap();
        assert_eq!(period, RentalPeriod { full_days: 1, half_days: 0 });

        let period = RentalPeriod::calculate(
            date("2024-03-01"),
            None,
            date("2024-03-01"),
            None,
            &RentalPolicy::default(),
        )
        .unwrap();
        assert_eq!(period.full_days, 1);
    }

    #[test]
    fn test_return_before_delivery_is_rejected() {
        let result = RentalPeriod::calculate(
            date("2024-03-05"),
            None,
            date("2024-03-04"),
            None,
            &RentalPolicy::default(),
        );
        assert_eq!(result, Err(PricingError::ReturnBeforeDelivery));

        let result = RentalPeriod::calculate(
            date("2024-03-04"),
            Some(time("15:00")),
            date("2024-03-04"),
            Some(time("09:00")),
            &RentalPolicy::default(),
        );
        assert_eq!(result, Err(PricingError::ReturnBeforeDelivery));
    }

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_return_window_starts_at_actual_delivery() {
        let window = return_window(
            Some(at("2024-03-02T10:00:00Z")),
            (date("2024-03-01"), Some(time("08:00"))),
            (Some(date("2024-03-05")), Some(time("14:00"))),
            at("2024-04-01T00:00:00Z"),
            &RentalPolicy::default(),
        )
        .unwrap();
        assert_eq!(window.return_date, date("2024-03-05"));
        assert_eq!(window.period, RentalPeriod { full_days: 3, half_days: 1 });
    }

    #[test]
    fn test_return_window_falls_back_to_planned_delivery() {
        let window = return_window(
            None,
            (date("2024-03-01"), Some(time("10:00"))),
            (Some(date("2024-03-03")), Some(time("10:00"))),
            at("2024-04-01T00:00:00Z"),
            &RentalPolicy::default(),
        )
        .unwrap();
        assert_eq!(window.period, RentalPeriod { full_days: 2, half_days: 0 });
    }

    #[test]
    fn test_return_window_without_date_uses_now() {
        let window = return_window(
            Some(at("2024-03-01T09:00:00Z")),
            (date("2024-03-01"), None),
            (None, None),
            at("2024-03-03T12:00:00Z"),
            &RentalPolicy::default(),
        )
        .unwrap();
        assert_eq!(window.return_date, date("2024-03-03"));
        assert_eq!(window.return_time, Some(time("12:00")));
        assert_eq!(window.period, RentalPeriod { full_days: 2, half_days: 1 });
    }

    #[test]
    fn test_return_window_date_without_time_counts_calendar_days() {
        let window = return_window(
            Some(at("2024-03-01T09:00:00Z")),
            (date("2024-03-01"), None),
            (Some(date("2024-03-04")), None),
            at("2024-04-01T00:00:00Z"),
            &RentalPolicy::default(),
        )
        .unwrap();
        assert_eq!(window.return_time, None);
        assert_eq!(window.period, RentalPeriod { full_days: 3, half_days: 0 });
    }

    #[test]
    fn test_return_window_before_delivery_is_rejected() {
        let result = return_window(
            Some(at("2024-03-05T09:00:00Z")),
            (date("2024-03-01"), None),
            (Some(date("2024-03-04")), None),
            at("2024-04-01T00:00:00Z"),
            &RentalPolicy::default(),
        );
        assert_eq!(result, Err(PricingError::ReturnBeforeDelivery));
    }

    #[test]
    fn test_policy_bounds() {
        assert!(RentalPolicy::new(0).is_none());
        assert!(RentalPolicy::new(24).is_none());
        assert_eq!(RentalPolicy::new(6), Some(RentalPolicy::default()));
    }
}
