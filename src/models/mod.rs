// src/models/mod.rs
pub mod import;
pub mod student;
pub mod tracking;
pub mod user;

use thiserror::Error;

/// Valor textual que não corresponde a nenhuma variante conhecida de um enum
/// guardado como TEXT na DB (risk_level, status, outcome).
#[derive(Debug, Error)]
#[error("valor desconhecido para {kind}: '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
