use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::patch::double_option;
use crate::models::payment::Payment;
use crate::models::sale::{
    ChargeType, PaymentStatus, Sale, SaleStatus, SalesCharge, VehicleUsage,
};
use crate::services::charge_aggregator::ChargeLine;
use crate::utils::validation::{
    validate_non_negative, validate_not_blank, validate_phone, validate_positive_amount,
};

// Pago opcional registrado junto con una reserva, entrega o devolución
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaymentInput {
    #[validate(custom = "validate_positive_amount")]
    pub amount: Decimal,
    #[validate(length(min = 1, max = 50))]
    pub payment_method: String,
    pub remarks: Option<String>,
}

// Request para crear una venta
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSaleRequest {
    pub vehicle_id: Uuid,
    #[validate(custom = "validate_not_blank")]
    pub customer_name: String,
    #[validate(custom = "validate_phone")]
    pub customer_phone: String,
    pub customer_address: Option<String>,
    pub booking_date: Option<NaiveDate>,
    pub date_of_delivery: NaiveDate,
    pub delivery_time: Option<NaiveTime>,
    pub return_date: NaiveDate,
    pub return_time: Option<NaiveTime>,
    pub remarks: Option<String>,
    #[serde(default)]
    pub charges: Vec<ChargeLine>,
    pub initial_payment: Option<PaymentInput>,
}

// Request de entrega del vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct DeliverSaleRequest {
    #[validate(custom = "validate_non_negative")]
    pub odometer_reading: Decimal,
    #[validate(custom = "validate_non_negative")]
    pub fuel_level: Option<Decimal>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub payment: Option<PaymentInput>,
}

// Request de devolución del vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct ReturnSaleRequest {
    pub actual_return_date: Option<NaiveDate>,
    pub actual_return_time: Option<NaiveTime>,
    #[validate(custom = "validate_non_negative")]
    pub odometer_reading: Decimal,
    #[validate(custom = "validate_non_negative")]
    pub fuel_level: Option<Decimal>,
    #[serde(default)]
    pub charges: Vec<ChargeLine>,
    pub payment: Option<PaymentInput>,
    pub remarks: Option<String>,
}

/// Actualización parcial de una venta abierta.
///
/// Cada campo puede faltar (sin cambio) o venir con valor; los opcionales
/// admiten además `null` para vaciarlos. Importes, estado y días no son
/// editables por esta vía.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SalePatch {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub customer_address: Option<Option<String>>,
    pub booking_date: Option<NaiveDate>,
    pub date_of_delivery: Option<NaiveDate>,
    #[serde(default, deserialize_with = "double_option")]
    pub delivery_time: Option<Option<NaiveTime>>,
    pub return_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "double_option")]
    pub return_time: Option<Option<NaiveTime>>,
    #[serde(default, deserialize_with = "double_option")]
    pub remarks: Option<Option<String>>,
}

impl SalePatch {
    pub fn is_empty(&self) -> bool {
        self.customer_name.is_none()
            && self.customer_phone.is_none()
            && self.customer_address.is_none()
            && self.booking_date.is_none()
            && self.date_of_delivery.is_none()
            && self.delivery_time.is_none()
            && self.return_date.is_none()
            && self.return_time.is_none()
            && self.remarks.is_none()
    }

    /// El parche toca fechas u horas, por lo que hay que recalcular días y total
    pub fn touches_schedule(&self) -> bool {
        self.date_of_delivery.is_some()
            || self.delivery_time.is_some()
            || self.return_date.is_some()
            || self.return_time.is_some()
    }

    /// Validar los campos de texto presentes
    pub fn check(&self) -> Result<(), validator::ValidationErrors> {
        let mut errors = validator::ValidationErrors::new();
        if let Some(name) = &self.customer_name {
            if let Err(e) = validate_not_blank(name) {
                errors.add("customer_name", e);
            }
        }
        if let Some(phone) = &self.customer_phone {
            if let Err(e) = validate_phone(phone) {
                errors.add("customer_phone", e);
            }
        }
        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Fusionar los campos presentes sobre la venta
    pub fn apply(self, sale: &mut Sale) {
        if let Some(v) = self.customer_name {
            sale.customer_name = v.trim().to_string();
        }
        if let Some(v) = self.customer_phone {
            sale.customer_phone = v.trim().to_string();
        }
        if let Some(v) = self.customer_address {
            sale.customer_address = v;
        }
        if let Some(v) = self.booking_date {
            sale.booking_date = v;
        }
        if let Some(v) = self.date_of_delivery {
            sale.date_of_delivery = v;
        }
        if let Some(v) = self.delivery_time {
            sale.delivery_time = v;
        }
        if let Some(v) = self.return_date {
            sale.return_date = v;
        }
        if let Some(v) = self.return_time {
            sale.return_time = v;
        }
        if let Some(v) = self.remarks {
            sale.remarks = v;
        }
    }
}

// Request de cargo (alta o sustitución)
#[derive(Debug, Deserialize, Validate)]
pub struct ChargeRequest {
    pub charge_type: ChargeType,
    #[validate(custom = "validate_positive_amount")]
    pub amount: Decimal,
}

// Request para cambiar el importe de un cargo existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateChargeRequest {
    #[validate(custom = "validate_positive_amount")]
    pub amount: Decimal,
}

/// Filtro de `GET /sales`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SaleFilter {
    pub status: Option<SaleStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub vehicle_id: Option<Uuid>,
    pub search: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisabledDatesQuery {
    pub vehicle_id: Uuid,
    pub exclude_sale_id: Option<Uuid>,
}

// Response de detalle de venta
#[derive(Debug, Serialize)]
pub struct SaleDetail {
    #[serde(flatten)]
    pub sale: Sale,
    pub charges: Vec<SalesCharge>,
    pub payments: Vec<Payment>,
    pub usages: Vec<VehicleUsage>,
    pub total_paid: Decimal,
    pub balance: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_sale() -> Sale {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        Sale {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            customer_name: "Ram Bahadur".to_string(),
            customer_phone: "9800000000".to_string(),
            customer_address: Some("Kathmandu".to_string()),
            booking_date: day,
            date_of_delivery: day,
            delivery_time: None,
            return_date: day.succ_opt().unwrap(),
            return_time: None,
            actual_delivery_date: None,
            actual_return_date: None,
            actual_return_time: None,
            charge_per_day: dec!(500),
            charge_half_day: dec!(250),
            full_days: 1,
            half_days: 0,
            number_of_days: dec!(1),
            base_amount: dec!(500),
            total_amount: dec!(500),
            status: SaleStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            is_damaged: false,
            is_washed: false,
            is_delayed: false,
            remarks: Some("first booking".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_patch_distinguishes_null_from_absent() {
        let patch: SalePatch =
            serde_json::from_str(r#"{"customer_address": null, "customer_name": "Sita"}"#).unwrap();
        assert!(!patch.touches_schedule());

        let mut sale = sample_sale();
        patch.apply(&mut sale);
        assert_eq!(sale.customer_name, "Sita");
        assert_eq!(sale.customer_address, None);
        assert_eq!(sale.remarks.as_deref(), Some("first booking"));
    }

    #[test]
    fn test_patch_trims_customer_contact() {
        let patch: SalePatch = serde_json::from_str(
            r#"{"customer_name": "  Hari Prasad ", "customer_phone": " 9811111111 "}"#,
        )
        .unwrap();

        let mut sale = sample_sale();
        patch.apply(&mut sale);
        assert_eq!(sale.customer_name, "Hari Prasad");
        assert_eq!(sale.customer_phone, "9811111111");
    }

    #[test]
    fn test_patch_rejects_amount_fields() {
        let parsed: Result<SalePatch, _> = serde_json::from_str(r#"{"total_amount": "1"}"#);
        assert!(parsed.is_err());
        let empty: SalePatch = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_patch_schedule_change() {
        let patch: SalePatch =
            serde_json::from_str(r#"{"return_date": "2024-03-05", "return_time": "18:00:00"}"#).unwrap();
        assert!(patch.touches_schedule());

        let mut sale = sample_sale();
        patch.apply(&mut sale);
        assert_eq!(sale.return_date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(sale.return_time, NaiveTime::from_hms_opt(18, 0, 0));
    }

    #[test]
    fn test_patch_check_validates_present_fields() {
        let patch: SalePatch = serde_json::from_str(r#"{"customer_phone": "12"}"#).unwrap();
        assert!(patch.check().is_err());
        let patch: SalePatch = serde_json::from_str(r#"{"customer_name": "  "}"#).unwrap();
        assert!(patch.check().is_err());
    }
}
