//! Modelo de Company
//!
//! Inquilino del sistema: todos los datos se aíslan por `company_id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Company - mapea exactamente a la tabla companies
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Company {
    pub fn new(name: String, address: Option<String>, phone: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            address,
            phone,
            created_at: Utc::now(),
        }
    }
}
