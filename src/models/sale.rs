//! Modelo de Sale (alquiler)
//!
//! Este módulo contiene la venta/alquiler, sus cargos detallados y los
//! registros de uso (odómetro/combustible). Mapea exactamente al schema
//! PostgreSQL.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del ciclo de vida - mapea al ENUM sale_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "sale_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Pending,
    Active,
    Completed,
    Cancelled,
}

impl SaleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Pending => "pending",
            SaleStatus::Active => "active",
            SaleStatus::Completed => "completed",
            SaleStatus::Cancelled => "cancelled",
        }
    }
}

/// Estado de pago derivado - mapea al ENUM payment_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Partial,
    Paid,
}

/// Tipo de cargo - mapea al ENUM charge_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "charge_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChargeType {
    Discount,
    Wash,
    Damage,
    Delay,
    Other,
}

impl ChargeType {
    /// Descuento y otros abonos se restan del total
    pub fn is_credit(&self) -> bool {
        matches!(self, ChargeType::Discount | ChargeType::Other)
    }
}

/// Sale principal - mapea exactamente a la tabla sales
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Sale {
    pub id: Uuid,
    pub company_id: Uuid,
    pub vehicle_id: Uuid,
    pub user_id: Uuid,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: Option<String>,
    pub booking_date: NaiveDate,
    pub date_of_delivery: NaiveDate,
    pub delivery_time: Option<NaiveTime>,
    pub return_date: NaiveDate,
    pub return_time: Option<NaiveTime>,
    pub actual_delivery_date: Option<DateTime<Utc>>,
    pub actual_return_date: Option<NaiveDate>,
    pub actual_return_time: Option<NaiveTime>,
    pub charge_per_day: Decimal,
    pub charge_half_day: Decimal,
    pub full_days: i32,
    pub half_days: i32,
    pub number_of_days: Decimal,
    pub base_amount: Decimal,
    pub total_amount: Decimal,
    pub status: SaleStatus,
    pub payment_status: PaymentStatus,
    pub is_damaged: bool,
    pub is_washed: bool,
    pub is_delayed: bool,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Cargo detallado - mapea a la tabla sales_charges
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SalesCharge {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub charge_type: ChargeType,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Momento del registro de uso - mapea al ENUM usage_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "usage_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UsageType {
    Delivery,
    Return,
}

/// Lectura de odómetro/combustible - mapea a la tabla vehicle_usages
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VehicleUsage {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub vehicle_id: Uuid,
    pub usage_type: UsageType,
    pub odometer_reading: Decimal,
    pub fuel_level: Option<Decimal>,
    pub recorded_at: DateTime<Utc>,
}
