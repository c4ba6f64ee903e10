use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::dto::patch::double_option;
use crate::utils::validation::validate_positive_amount;

// Request para crear un gasto
#[derive(Debug, Deserialize, Validate)]
pub struct CreateExpenseRequest {
    pub vehicle_id: Option<Uuid>,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(custom = "validate_positive_amount")]
    pub amount: Decimal,
    pub expense_date: NaiveDate,
    pub description: Option<String>,
}

// Request para actualizar un gasto; `null` desvincula el vehículo o borra la descripción
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateExpenseRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub vehicle_id: Option<Option<Uuid>>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    #[validate(custom = "validate_positive_amount")]
    pub amount: Option<Decimal>,
    pub expense_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

/// Filtro de `GET /expenses`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpenseFilter {
    pub vehicle_id: Option<Uuid>,
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
