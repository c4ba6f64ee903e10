//! Ventanas de ingresos
//!
//! Convierte la consulta `period`/`date`/`start_date`/`end_date` en un rango
//! de fechas inclusivo.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::services::availability::DateRange;
use crate::utils::errors::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RevenuePeriodKind {
    #[default]
    Day,
    Month,
    Year,
    Custom,
}

/// Momento en que se reconoce el ingreso
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecognizeAt {
    #[default]
    Payment,
    Booking,
    Return,
}

/// Resolver la ventana inclusiva; `date` por defecto es `today`
pub fn resolve(
    kind: RevenuePeriodKind,
    date: Option<NaiveDate>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<DateRange, AppError> {
    let anchor = date.unwrap_or(today);
    let window = match kind {
        RevenuePeriodKind::Day => DateRange::new(anchor, anchor),
        RevenuePeriodKind::Month => {
            let start = anchor.with_day(1);
            let end = start.and_then(last_day_of_month);
            start.zip(end).and_then(|(s, e)| DateRange::new(s, e))
        }
        RevenuePeriodKind::Year => {
            let start = NaiveDate::from_ymd_opt(anchor.year(), 1, 1);
            let end = NaiveDate::from_ymd_opt(anchor.year(), 12, 31);
            start.zip(end).and_then(|(s, e)| DateRange::new(s, e))
        }
        RevenuePeriodKind::Custom => {
            let (Some(start), Some(end)) = (start_date, end_date) else {
                return Err(AppError::BadRequest(
                    "start_date and end_date are required for a custom period".to_string(),
                ));
            };
            return DateRange::new(start, end).ok_or_else(|| {
                AppError::BadRequest("end_date must not be before start_date".to_string())
            });
        }
    };

    window.ok_or_else(|| AppError::BadRequest("invalid revenue period".to_string()))
}

fn last_day_of_month(first: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).and_then(|d| d.pred_opt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_day_defaults_to_today() {
        let today = d(2024, 5, 10);
        let w = resolve(RevenuePeriodKind::Day, None, None, None, today).unwrap();
        assert_eq!((w.start, w.end), (today, today));
    }

    #[test]
    fn test_month_window() {
        let w = resolve(RevenuePeriodKind::Month, Some(d(2024, 2, 14)), None, None, d(2024, 5, 1)).unwrap();
        assert_eq!((w.start, w.end), (d(2024, 2, 1), d(2024, 2, 29)));

        let w = resolve(RevenuePeriodKind::Month, Some(d(2023, 12, 3)), None, None, d(2024, 5, 1)).unwrap();
        assert_eq!((w.start, w.end), (d(2023, 12, 1), d(2023, 12, 31)));
    }

    #[test]
    fn test_year_window() {
        let w = resolve(RevenuePeriodKind::Year, None, None, None, d(2024, 5, 10)).unwrap();
        assert_eq!((w.start, w.end), (d(2024, 1, 1), d(2024, 12, 31)));
    }

    #[test]
    fn test_custom_window_requires_ordered_bounds() {
        let today = d(2024, 5, 10);
        assert!(resolve(RevenuePeriodKind::Custom, None, Some(d(2024, 1, 1)), None, today).is_err());
        assert!(resolve(
            RevenuePeriodKind::Custom,
            None,
            Some(d(2024, 2, 1)),
            Some(d(2024, 1, 1)),
            today
        )
        .is_err());

        let w = resolve(
            RevenuePeriodKind::Custom,
            None,
            Some(d(2024, 1, 1)),
            Some(d(2024, 3, 31)),
            today,
        )
        .unwrap();
        assert_eq!((w.start, w.end), (d(2024, 1, 1), d(2024, 3, 31)));
    }
}
