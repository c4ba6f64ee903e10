use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::vehicle::{Vehicle, VehicleServicing, VehicleStatus};
use crate::utils::validation::{
    validate_non_negative, validate_positive_amount, validate_registration_number,
};

// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(custom = "validate_registration_number")]
    pub registration_number: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub vehicle_type: String,
    #[validate(length(min = 1, max = 20))]
    pub fuel_type: String,
    #[validate(custom = "validate_positive_amount")]
    pub charge_per_day: Decimal,
    #[validate(custom = "validate_non_negative")]
    pub current_odometer: Option<Decimal>,
    pub status: Option<VehicleStatus>,
}

// Request para actualizar un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(custom = "validate_registration_number")]
    pub registration_number: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub vehicle_type: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub fuel_type: Option<String>,
    #[validate(custom = "validate_positive_amount")]
    pub charge_per_day: Option<Decimal>,
    #[validate(custom = "validate_non_negative")]
    pub current_odometer: Option<Decimal>,
    pub status: Option<VehicleStatus>,
}

/// Columna de ordenación del listado
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VehicleSort {
    #[default]
    CreatedAt,
    Name,
    ChargePerDay,
    RegistrationNumber,
}

impl VehicleSort {
    pub fn column(&self) -> &'static str {
        match self {
            VehicleSort::CreatedAt => "created_at",
            VehicleSort::Name => "name",
            VehicleSort::ChargePerDay => "charge_per_day",
            VehicleSort::RegistrationNumber => "registration_number",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Filtro tipado de `GET /vehical`; las claves desconocidas se rechazan
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VehicleFilter {
    pub status: Option<VehicleStatus>,
    pub vehicle_type: Option<String>,
    pub brand: Option<String>,
    pub fuel_type: Option<String>,
    pub search: Option<String>,
    pub min_rate: Option<Decimal>,
    pub max_rate: Option<Decimal>,
    pub sort: Option<VehicleSort>,
    pub order: Option<SortOrder>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

// Request de mantenimiento: configurar intervalo y/o registrar un servicio
#[derive(Debug, Deserialize, Validate)]
pub struct ServicingRequest {
    #[validate(custom = "validate_positive_amount")]
    pub interval_km: Option<Decimal>,
    #[validate(custom = "validate_non_negative")]
    pub serviced_at_km: Option<Decimal>,
}

// Response de mantenimiento: estado vigente + historial
#[derive(Debug, Serialize)]
pub struct ServicingOverview {
    pub vehicle: Vehicle,
    pub current: Option<VehicleServicing>,
    pub history: Vec<VehicleServicing>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_filter_rejects_unknown_keys() {
        let parsed: Result<VehicleFilter, _> =
            serde_json::from_str(r#"{"status": "available", "colour": "red"}"#);
        assert!(parsed.is_err());

        let parsed: VehicleFilter =
            serde_json::from_str(r#"{"status": "maintenance", "sort": "charge_per_day", "order": "asc"}"#)
                .unwrap();
        assert_eq!(parsed.status, Some(VehicleStatus::Maintenance));
        assert_eq!(parsed.sort.unwrap_or_default().column(), "charge_per_day");
        assert_eq!(parsed.order.unwrap_or_default().keyword(), "ASC");
    }
}
