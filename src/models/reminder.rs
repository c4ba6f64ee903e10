//! Modelo de Reminder
//!
//! Obligación recurrente de mantenimiento o administrativa de un vehículo
//! y el historial inmutable de confirmaciones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Tipo de recordatorio - mapea al ENUM reminder_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "reminder_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReminderType {
    Emi,
    Insurance,
    Billbook,
    Servicing,
}

/// Frecuencia - mapea al ENUM reminder_frequency
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "reminder_frequency", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReminderFrequency {
    Monthly,
    Yearly,
    Custom,
}

/// Reminder - mapea exactamente a la tabla reminders
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reminder {
    pub id: Uuid,
    pub company_id: Uuid,
    pub vehicle_id: Uuid,
    pub reminder_type: ReminderType,
    pub title: String,
    pub start_date: DateTime<Utc>,
    pub frequency: ReminderFrequency,
    pub custom_interval: Option<i32>,
    pub next_due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Confirmación de un recordatorio - mapea a reminder_acknowledgements
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReminderAcknowledgement {
    pub id: Uuid,
    pub reminder_id: Uuid,
    pub user_id: Uuid,
    pub acknowledged_at: DateTime<Utc>,
}
