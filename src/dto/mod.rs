//! DTOs de la API
//!
//! Formas de petición y respuesta; los modelos de `models` se serializan
//! directamente cuando no hace falta una vista distinta.

pub mod api_response;
pub mod auth_dto;
pub mod expense_dto;
pub mod patch;
pub mod payment_dto;
pub mod reminder_dto;
pub mod revenue_dto;
pub mod sale_dto;
pub mod settings_dto;
pub mod user_dto;
pub mod vehicle_dto;

pub use api_response::{ApiResponse, Paginated};
