// src/models/import.rs
// Estruturas de resposta do upload de CSV (preview e importação).
use super::student::{RiskLevel, Student};
use serde::Serialize;

/// Linha transformada mostrada ao mentor antes de confirmar a importação.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRow {
    // Ausente no JSON quando a coluna não existe no ficheiro
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "class", skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub attendance: String, // Já formatada, ex: "82%"
    pub score_average: f64,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub preview: Vec<PreviewRow>,
    pub total_rows: usize, // Linhas do ficheiro inteiro, não só do preview
}

/// Linha do CSV que não deu origem a um aluno.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFailure {
    pub row: usize, // Índice 1-based entre as linhas de dados
    pub line: u64,  // Linha no ficheiro original (o cabeçalho é a linha 1)
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub message: String,
    pub count: usize,
    pub total_rows: usize,
    pub students: Vec<Student>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<Vec<RowFailure>>,
}
