use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::services::revenue::{RecognizeAt, RevenuePeriodKind};

/// Query de `GET /revenue`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RevenueQuery {
    pub period: Option<RevenuePeriodKind>,
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub recognize_at: Option<RecognizeAt>,
}

#[derive(Debug, Serialize)]
pub struct RevenueReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub recognize_at: RecognizeAt,
    pub revenue: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
    pub sale_count: i64,
}
