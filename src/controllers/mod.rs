//! Controladores
//!
//! Casos de uso de la API: validan la entrada, abren las transacciones y
//! combinan repositorios con los motores de `services`.

pub mod auth_controller;
pub mod expense_controller;
pub mod payment_controller;
pub mod reminder_controller;
pub mod revenue_controller;
pub mod sale_controller;
pub mod settings_controller;
pub mod user_controller;
pub mod vehicle_controller;
