//! Agregación de cargos de una venta
//!
//! `total = full_days * tarifa + half_days * tarifa * 0.5 + extras - créditos`,
//! donde los extras son lavado, daños y retraso, y los créditos son el
//! descuento y otros abonos. Hay como máximo un cargo por tipo y venta.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::sale::ChargeType;
use crate::services::rental_calculator::{half_day_factor, PricingError, RentalPeriod};

/// Un cargo detallado (tipo + importe)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeLine {
    pub charge_type: ChargeType,
    pub amount: Decimal,
}

/// Desglose del importe a pagar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChargeBreakdown {
    pub charge_per_day: Decimal,
    pub charge_half_day: Decimal,
    pub base_amount: Decimal,
    pub extras: Decimal,
    pub credits: Decimal,
    pub total_amount: Decimal,
}

impl ChargeBreakdown {
    pub fn compute(
        charge_per_day: Decimal,
        period: &RentalPeriod,
        charges: &[ChargeLine],
    ) -> Result<Self, PricingError> {
        if charge_per_day <= Decimal::ZERO {
            return Err(PricingError::NonPositiveRate);
        }

        let charge_half_day = charge_per_day * half_day_factor();
        let base_amount = charge_per_day * Decimal::from(period.full_days)
            + charge_half_day * Decimal::from(period.half_days);

        let mut extras = Decimal::ZERO;
        let mut credits = Decimal::ZERO;
        for line in charges {
            if line.amount <= Decimal::ZERO {
                return Err(PricingError::NonPositiveCharge(line.charge_type));
            }
            if line.charge_type.is_credit() {
                credits += line.amount;
            } else {
                extras += line.amount;
            }
        }

        let total_amount = base_amount + extras - credits;
        if total_amount < Decimal::ZERO {
            return Err(PricingError::NegativeTotal);
        }

        Ok(Self {
            charge_per_day: round_money(charge_per_day),
            charge_half_day: round_money(charge_half_day),
            base_amount: round_money(base_amount),
            extras: round_money(extras),
            credits: round_money(credits),
            total_amount: round_money(total_amount),
        })
    }
}

/// Redondeo a dos decimales para importes persistidos
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Añadir un cargo; si ya existe uno del mismo tipo se sustituye su importe.
/// Devuelve `true` cuando se sustituyó un cargo existente.
pub fn upsert_charge(charges: &mut Vec<ChargeLine>, line: ChargeLine) -> bool {
    match charges.iter_mut().find(|c| c.charge_type == line.charge_type) {
        Some(existing) => {
            existing.amount = line.amount;
            true
        }
        None => {
            charges.push(line);
            false
        }
    }
}

/// Marcas de daño, lavado y retraso derivadas de los cargos
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChargeFlags {
    pub is_damaged: bool,
    pub is_washed: bool,
    pub is_delayed: bool,
}

impl ChargeFlags {
    pub fn from_charges(charges: &[ChargeLine]) -> Self {
        let has = |kind: ChargeType| charges.iter().any(|c| c.charge_type == kind);
        Self {
            is_damaged: has(ChargeType::Damage),
            is_washed: has(ChargeType::Wash),
            is_delayed: has(ChargeType::Delay),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(charge_type: ChargeType, amount: Decimal) -> ChargeLine {
        ChargeLine { charge_type, amount }
    }

    #[test]
    fn test_three_and_a_half_days_with_wash() {
        let period = RentalPeriod { full_days: 3, half_days: 1 };
        let breakdown =
            ChargeBreakdown::compute(dec!(500), &period, &[line(ChargeType::Wash, dec!(100))])
                .unwrap();

        assert_eq!(breakdown.charge_half_day, dec!(250));
        assert_eq!(breakdown.base_amount, dec!(1750));
        assert_eq!(breakdown.extras, dec!(100));
        assert_eq!(breakdown.total_amount, dec!(1850));
    }

    #[test]
    fn test_credits_are_subtracted() {
        let period = RentalPeriod { full_days: 2, half_days: 0 };
        let charges = [
            line(ChargeType::Damage, dec!(750.50)),
            line(ChargeType::Delay, dec!(200)),
            line(ChargeType::Discount, dec!(300)),
            line(ChargeType::Other, dec!(50.25)),
        ];
        let breakdown = ChargeBreakdown::compute(dec!(1200), &period, &charges).unwrap();

        assert_eq!(breakdown.base_amount, dec!(2400));
        assert_eq!(breakdown.extras, dec!(950.50));
        assert_eq!(breakdown.credits, dec!(350.25));
        assert_eq!(breakdown.total_amount, dec!(3000.25));
    }

    #[test]
    fn test_total_matches_formula_without_drift() {
        // 0.1 + 0.2 no debe acumular error binario
        let period = RentalPeriod { full_days: 7, half_days: 1 };
        let charges = [
            line(ChargeType::Wash, dec!(0.1)),
            line(ChargeType::Delay, dec!(0.2)),
        ];
        let breakdown = ChargeBreakdown::compute(dec!(333.33), &period, &charges).unwrap();

        let expected = dec!(333.33) * dec!(7) + dec!(333.33) * dec!(0.5) + dec!(0.3);
        assert_eq!(breakdown.total_amount, round_money(expected));
        assert_eq!(breakdown.total_amount, dec!(2500.28));
    }

    #[test]
    fn test_negative_total_is_rejected() {
        let period = RentalPeriod { full_days: 1, half_days: 0 };
        let result =
            ChargeBreakdown::compute(dec!(100), &period, &[line(ChargeType::Discount, dec!(150))]);
        assert_eq!(result, Err(PricingError::NegativeTotal));
    }

    #[test]
    fn test_invalid_amounts_are_rejected() {
        let period = RentalPeriod { full_days: 1, half_days: 0 };
        assert_eq!(
            ChargeBreakdown::compute(dec!(0), &period, &[]),
            Err(PricingError::NonPositiveRate)
        );
        assert_eq!(
            ChargeBreakdown::compute(dec!(100), &period, &[line(ChargeType::Wash, dec!(0))]),
            Err(PricingError::NonPositiveCharge(ChargeType::Wash))
        );
    }

    #[test]
    fn test_upsert_replaces_existing_type() {
        let mut charges = vec![line(ChargeType::Wash, dec!(100))];

        assert!(!upsert_charge(&mut charges, line(ChargeType::Damage, dec!(400))));
        assert!(upsert_charge(&mut charges, line(ChargeType::Wash, dec!(150))));

        assert_eq!(charges.len(), 2);
        assert_eq!(charges[0], line(ChargeType::Wash, dec!(150)));

        // Recalcular con el mismo conjunto es idempotente
        let period = RentalPeriod { full_days: 1, half_days: 0 };
        let first = ChargeBreakdown::compute(dec!(500), &period, &charges).unwrap();
        upsert_charge(&mut charges, line(ChargeType::Wash, dec!(150)));
        let second = ChargeBreakdown::compute(dec!(500), &period, &charges).unwrap();
        assert_eq!(first, second);
        assert_eq!(second.total_amount, dec!(1050));
    }

    #[test]
    fn test_flags_from_charges() {
        let flags = ChargeFlags::from_charges(&[
            line(ChargeType::Damage, dec!(10)),
            line(ChargeType::Discount, dec!(5)),
        ]);
        assert_eq!(
            flags,
            ChargeFlags { is_damaged: true, is_washed: false, is_delayed: false }
        );
    }
}
