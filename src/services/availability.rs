//! Disponibilidad de vehículos
//!
//! Rangos de fechas inclusivos ocupados por ventas `pending`/`active`.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

/// Rango inclusivo `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (end >= start).then_some(Self { start, end })
    }

    /// Dos rangos inclusivos se solapan si comparten al menos un día
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// Rango reservado por una venta
#[derive(Debug, Clone, Serialize)]
pub struct BookedRange {
    pub sale_id: Uuid,
    #[serde(flatten)]
    pub range: DateRange,
}

/// Primera reserva que choca con `wanted`, ignorando la venta `exclude`
pub fn find_conflict<'a>(
    wanted: &DateRange,
    booked: &'a [BookedRange],
    exclude: Option<Uuid>,
) -> Option<&'a BookedRange> {
    booked
        .iter()
        .filter(|b| Some(b.sale_id) != exclude)
        .find(|b| b.range.overlaps(wanted))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn range(a: NaiveDate, b: NaiveDate) -> DateRange {
        DateRange::new(a, b).unwrap()
    }

    #[test]
    fn test_new_rejects_inverted_range() {
        assert!(DateRange::new(d(2024, 3, 5), d(2024, 3, 4)).is_none());
        assert!(DateRange::new(d(2024, 3, 5), d(2024, 3, 5)).is_some());
    }

    #[test]
    fn test_overlap_is_inclusive() {
        let a = range(d(2024, 3, 1), d(2024, 3, 5));
        assert!(a.overlaps(&range(d(2024, 3, 5), d(2024, 3, 8))));
        assert!(a.overlaps(&range(d(2024, 2, 20), d(2024, 3, 1))));
        assert!(a.overlaps(&range(d(2024, 3, 2), d(2024, 3, 3))));
        assert!(!a.overlaps(&range(d(2024, 3, 6), d(2024, 3, 9))));
    }

    #[test]
    fn test_find_conflict_skips_excluded_sale() {
        let own = Uuid::new_v4();
        let other = Uuid::new_v4();
        let booked = vec![
            BookedRange { sale_id: own, range: range(d(2024, 3, 1), d(2024, 3, 5)) },
            BookedRange { sale_id: other, range: range(d(2024, 3, 10), d(2024, 3, 12)) },
        ];

        let wanted = range(d(2024, 3, 3), d(2024, 3, 6));
        assert_eq!(find_conflict(&wanted, &booked, None).map(|b| b.sale_id), Some(own));
        assert!(find_conflict(&wanted, &booked, Some(own)).is_none());

        let wanted = range(d(2024, 3, 4), d(2024, 3, 10));
        assert_eq!(find_conflict(&wanted, &booked, Some(own)).map(|b| b.sale_id), Some(other));
    }
}
