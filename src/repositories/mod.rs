//! Repositorios
//!
//! Acceso SQL por agregado. Las operaciones que participan en una
//! transacción reciben `&mut PgConnection`; las lecturas simples usan el pool.

pub mod company_repository;
pub mod expense_repository;
pub mod payment_repository;
pub mod reminder_repository;
pub mod revenue_repository;
pub mod sale_repository;
pub mod settings_repository;
pub mod user_repository;
pub mod vehicle_repository;
