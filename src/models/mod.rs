//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL, incluidos los ENUM de Postgres.

pub mod company;
pub mod expense;
pub mod payment;
pub mod reminder;
pub mod sale;
pub mod user;
pub mod vehicle;
