//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y su historial de servicio.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del vehículo - mapea al ENUM vehicle_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "vehicle_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    Available,
    Rented,
    Maintenance,
    Inactive,
}

impl VehicleStatus {
    /// Se puede reservar en este estado
    pub fn is_bookable(&self) -> bool {
        matches!(self, VehicleStatus::Available | VehicleStatus::Rented)
    }
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub registration_number: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub vehicle_type: String,
    pub fuel_type: String,
    pub charge_per_day: Decimal,
    pub status: VehicleStatus,
    pub current_odometer: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Registro de servicio - mapea a la tabla vehicle_servicings (sólo inserciones)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VehicleServicing {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub last_servicing_km: Decimal,
    pub next_servicing_km: Decimal,
    pub interval_km: Decimal,
    pub is_due: bool,
    pub created_at: DateTime<Utc>,
}
