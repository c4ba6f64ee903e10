//! Services module
//!
//! Este módulo contiene la lógica de negocio pura de la aplicación:
//! cálculo de días y cargos, libro de pagos, recurrencia de recordatorios,
//! ciclo de vida de la venta, disponibilidad, mantenimiento, ventanas de
//! ingresos y configuración del sistema.

pub mod availability;
pub mod charge_aggregator;
pub mod payment_ledger;
pub mod reminder_schedule;
pub mod rental_calculator;
pub mod revenue;
pub mod sale_lifecycle;
pub mod servicing;
pub mod settings;

pub use charge_aggregator::{ChargeBreakdown, ChargeLine};
pub use rental_calculator::{RentalPeriod, RentalPolicy};
pub use settings::{SettingsProvider, SystemSettings};
