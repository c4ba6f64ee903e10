//! Recurrencia de recordatorios
//!
//! Calcula la siguiente fecha de vencimiento de un recordatorio y el
//! rebase que produce una confirmación.

use chrono::{DateTime, Duration, Months, Utc};
use thiserror::Error;

use crate::models::reminder::ReminderFrequency;
use crate::utils::errors::AppError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("custom_interval is required for custom frequency")]
    MissingCustomInterval,

    #[error("custom_interval must be greater than zero")]
    InvalidCustomInterval,

    #[error("next due date is out of range")]
    OutOfRange,
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Regla de recurrencia ya validada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Monthly,
    Yearly,
    Custom(u32),
}

impl Frequency {
    /// Construir la regla a partir de las columnas `frequency` y `custom_interval`.
    /// El intervalo se ignora en frecuencias mensual y anual.
    pub fn from_parts(
        frequency: ReminderFrequency,
        custom_interval: Option<i32>,
    ) -> Result<Self, ScheduleError> {
        match frequency {
            ReminderFrequency::Monthly => Ok(Frequency::Monthly),
            ReminderFrequency::Yearly => Ok(Frequency::Yearly),
            ReminderFrequency::Custom => match custom_interval {
                None => Err(ScheduleError::MissingCustomInterval),
                Some(days) if days <= 0 => Err(ScheduleError::InvalidCustomInterval),
                Some(days) => Ok(Frequency::Custom(days as u32)),
            },
        }
    }

    /// Valor a persistir en `custom_interval`
    pub fn custom_interval(&self) -> Option<i32> {
        match self {
            Frequency::Custom(days) => Some(*days as i32),
            _ => None,
        }
    }

    /// Siguiente vencimiento contando desde `from`.
    /// Los meses se suman en calendario: el 31 de enero pasa al último día de febrero.
    pub fn next_due_date(&self, from: DateTime<Utc>) -> Result<DateTime<Utc>, ScheduleError> {
        match self {
            Frequency::Monthly => from.checked_add_months(Months::new(1)),
            Frequency::Yearly => from.checked_add_months(Months::new(12)),
            Frequency::Custom(days) => from.checked_add_signed(Duration::days(*days as i64)),
        }
        .ok_or(ScheduleError::OutOfRange)
    }
}

/// Vencimiento inicial: el valor indicado por el cliente se respeta tal cual;
/// si no se indica, es la propia fecha de inicio.
pub fn initial_next_due(start_date: DateTime<Utc>, supplied: Option<DateTime<Utc>>) -> DateTime<Utc> {
    supplied.unwrap_or(start_date)
}

/// Calendario persistido de un recordatorio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub frequency: ReminderFrequency,
    pub custom_interval: Option<i32>,
    pub start_date: DateTime<Utc>,
    pub next_due_date: DateTime<Utc>,
}

/// Campos de calendario presentes en una actualización
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduleChange {
    pub frequency: Option<ReminderFrequency>,
    pub custom_interval: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub next_due_date: Option<DateTime<Utc>>,
}

/// Aplicar una actualización al calendario.
///
/// Un `next_due_date` indicado se respeta; un nuevo `start_date` sin él
/// reinicia el vencimiento en la fecha de inicio. Si solo cambia la regla,
/// el vencimiento se recalcula desde `start_date`.
pub fn apply_update(current: &Schedule, change: &ScheduleChange) -> Result<Schedule, ScheduleError> {
    let frequency = change.frequency.unwrap_or(current.frequency);
    let rule = Frequency::from_parts(frequency, change.custom_interval.or(current.custom_interval))?;
    let start_date = change.start_date.unwrap_or(current.start_date);
    let rule_changed = change.frequency.is_some() || change.custom_interval.is_some();

    let next_due_date = if change.start_date.is_some() || change.next_due_date.is_some() {
        initial_next_due(start_date, change.next_due_date)
    } else if rule_changed {
        rule.next_due_date(start_date)?
    } else {
        current.next_due_date
    };

    Ok(Schedule {
        frequency,
        custom_interval: rule.custom_interval(),
        start_date,
        next_due_date,
    })
}

/// Nuevo calendario tras una confirmación
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rebase {
    pub start_date: DateTime<Utc>,
    pub next_due_date: DateTime<Utc>,
}

/// Rebasar el recordatorio sobre el instante de la confirmación
pub fn rebase(frequency: Frequency, acknowledged_at: DateTime<Utc>) -> Result<Rebase, ScheduleError> {
    Ok(Rebase {
        start_date: acknowledged_at,
        next_due_date: frequency.next_due_date(acknowledged_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_custom_interval_adds_days() {
        let freq = Frequency::from_parts(ReminderFrequency::Custom, Some(90)).unwrap();
        let next = freq.next_due_date(at(2024, 1, 15)).unwrap();
        assert_eq!(next.date_naive(), NaiveDate::from_ymd_opt(2024, 4, 14).unwrap());
    }

    #[test]
    fn test_monthly_is_calendar_correct() {
        let next = Frequency::Monthly.next_due_date(at(2024, 1, 31)).unwrap();
        assert_eq!(next, at(2024, 2, 29));

        let next = Frequency::Monthly.next_due_date(at(2023, 1, 31)).unwrap();
        assert_eq!(next, at(2023, 2, 28));

        let next = Frequency::Monthly.next_due_date(at(2024, 12, 15)).unwrap();
        assert_eq!(next, at(2025, 1, 15));
    }

    #[test]
    fn test_yearly_handles_leap_day() {
        assert_eq!(Frequency::Yearly.next_due_date(at(2024, 2, 29)).unwrap(), at(2025, 2, 28));
        assert_eq!(Frequency::Yearly.next_due_date(at(2024, 6, 1)).unwrap(), at(2025, 6, 1));
    }

    #[test]
    fn test_custom_requires_positive_interval() {
        assert_eq!(
            Frequency::from_parts(ReminderFrequency::Custom, None),
            Err(ScheduleError::MissingCustomInterval)
        );
        assert_eq!(
            Frequency::from_parts(ReminderFrequency::Custom, Some(0)),
            Err(ScheduleError::InvalidCustomInterval)
        );
        assert_eq!(
            Frequency::from_parts(ReminderFrequency::Monthly, Some(15)),
            Ok(Frequency::Monthly)
        );
        assert_eq!(Frequency::Monthly.custom_interval(), None);
        assert_eq!(Frequency::Custom(30).custom_interval(), Some(30));
    }

    #[test]
    fn test_initial_next_due() {
        let start = at(2024, 1, 15);
        assert_eq!(initial_next_due(start, None), start);
        assert_eq!(initial_next_due(start, Some(at(2024, 3, 1))), at(2024, 3, 1));
    }

    fn monthly_schedule() -> Schedule {
        Schedule {
            frequency: ReminderFrequency::Monthly,
            custom_interval: None,
            start_date: at(2024, 1, 15),
            next_due_date: at(2024, 2, 15),
        }
    }

    #[test]
    fn test_update_without_schedule_fields_keeps_due_date() {
        let current = monthly_schedule();
        let updated = apply_update(&current, &ScheduleChange::default()).unwrap();
        assert_eq!(updated, current);
    }

    #[test]
    fn test_update_honors_supplied_next_due_date() {
        let change = ScheduleChange {
            frequency: Some(ReminderFrequency::Yearly),
            next_due_date: Some(at(2024, 3, 1)),
            ..Default::default()
        };
        let updated = apply_update(&monthly_schedule(), &change).unwrap();
        assert_eq!(updated.frequency, ReminderFrequency::Yearly);
        assert_eq!(updated.next_due_date, at(2024, 3, 1));
    }

    #[test]
    fn test_update_start_date_resets_due_date() {
        let change = ScheduleChange {
            start_date: Some(at(2024, 6, 1)),
            ..Default::default()
        };
        let updated = apply_update(&monthly_schedule(), &change).unwrap();
        assert_eq!(updated.start_date, at(2024, 6, 1));
        assert_eq!(updated.next_due_date, at(2024, 6, 1));
    }

    #[test]
    fn test_update_rule_only_recomputes_from_start() {
        let change = ScheduleChange {
            frequency: Some(ReminderFrequency::Custom),
            custom_interval: Some(90),
            ..Default::default()
        };
        let updated = apply_update(&monthly_schedule(), &change).unwrap();
        assert_eq!(updated.custom_interval, Some(90));
        assert_eq!(updated.start_date, at(2024, 1, 15));
        assert_eq!(updated.next_due_date.date_naive(), NaiveDate::from_ymd_opt(2024, 4, 14).unwrap());

        let change = ScheduleChange {
            frequency: Some(ReminderFrequency::Yearly),
            ..Default::default()
        };
        let updated = apply_update(&monthly_schedule(), &change).unwrap();
        assert_eq!(updated.next_due_date, at(2025, 1, 15));
    }

    #[test]
    fn test_update_to_custom_requires_interval() {
        let change = ScheduleChange {
            frequency: Some(ReminderFrequency::Custom),
            ..Default::default()
        };
        assert_eq!(
            apply_update(&monthly_schedule(), &change),
            Err(ScheduleError::MissingCustomInterval)
        );
    }

    #[test]
    fn test_acknowledgement_moves_due_date_past_today() {
        let now = Utc::now();
        for freq in [Frequency::Monthly, Frequency::Yearly, Frequency::Custom(1)] {
            let rebased = rebase(freq, now).unwrap();
            assert_eq!(rebased.start_date, now);
            assert!(rebased.next_due_date.date_naive() > now.date_naive());
        }
    }
}
