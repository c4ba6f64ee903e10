use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Gasto de la empresa, opcionalmente ligado a un vehículo
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Expense {
    pub id: Uuid,
    pub company_id: Uuid,
    pub vehicle_id: Option<Uuid>,
    pub category: String,
    pub amount: Decimal,
    pub expense_date: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}
