// src/web/mod.rs
pub mod auth_handlers;
pub mod mw_auth;
pub mod routes;
pub mod student_handlers;
pub mod tracking_handlers;
pub mod upload_handlers;
