use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::reminder::{Reminder, ReminderAcknowledgement, ReminderFrequency, ReminderType};

// Request para crear un recordatorio
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReminderRequest {
    pub vehicle_id: Uuid,
    pub reminder_type: ReminderType,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub start_date: DateTime<Utc>,
    pub frequency: ReminderFrequency,
    #[validate(range(min = 1, message = "custom_interval must be greater than zero"))]
    pub custom_interval: Option<i32>,
    pub next_due_date: Option<DateTime<Utc>>,
}

// Request para actualizar un recordatorio
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateReminderRequest {
    pub reminder_type: Option<ReminderType>,
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub frequency: Option<ReminderFrequency>,
    #[validate(range(min = 1, message = "custom_interval must be greater than zero"))]
    pub custom_interval: Option<i32>,
    pub next_due_date: Option<DateTime<Utc>>,
}

/// Filtro de `GET /reminders`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReminderFilter {
    pub vehicle_id: Option<Uuid>,
    pub reminder_type: Option<ReminderType>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteReminderQuery {
    #[serde(default)]
    pub hard: bool,
}

// Response de confirmación: recordatorio rebasado + registro
#[derive(Debug, Serialize)]
pub struct AcknowledgeResponse {
    pub reminder: Reminder,
    pub acknowledgement: ReminderAcknowledgement,
}
