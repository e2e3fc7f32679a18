// src/services/mod.rs
pub mod auth_service;
pub mod csv_service;
pub mod history_service;
pub mod import_service;
pub mod risk_service;
pub mod student_service;
pub mod tracking_service;
pub mod user_service;
