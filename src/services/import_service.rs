// src/services/import_service.rs
// Preview e importação de alunos a partir de CSV. Os dois caminhos partilham
// `build_candidate`, por isso o preview classifica exatamente como a importação.
use crate::{
    error::AppResult,
    models::{
        import::{ImportReport, PreviewResponse, PreviewRow, RowFailure},
        student::{NewStudent, RiskLevel},
    },
    services::{
        csv_service::{self, CsvRow},
        risk_service, student_service,
    },
};
use sqlx::SqlitePool;

pub const PREVIEW_ROWS: usize = 5;

/// Política da importação perante falhas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// `true`: um erro da DB aborta o pedido (as linhas já gravadas ficam).
    /// `false`: a linha é registada como falhada e a importação continua.
    pub abort_on_storage_error: bool,
    /// Inclui a lista `failed` na resposta.
    pub report_failures: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        ImportOptions {
            abort_on_storage_error: false,
            report_failures: true,
        }
    }
}

/// Linha normalizada e já classificada, ainda por validar.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentCandidate {
    pub line: u64,
    pub name: Option<String>,
    pub class_name: Option<String>,
    pub attendance: f64,
    pub score_average: f64,
    pub risk_level: RiskLevel,
    pub profile_image_url: Option<String>,
}

impl StudentCandidate {
    /// Nome e turma são obrigatórios; o resto já tem valor por omissão.
    pub fn validate(self) -> Result<NewStudent, String> {
        let name = self.name.ok_or_else(|| "missing required field: name".to_string())?;
        let class_name = self.class_name.ok_or_else(|| "missing required field: class".to_string())?;
        Ok(NewStudent {
            name,
            class_name,
            attendance: self.attendance,
            score_average: self.score_average,
            risk_level: self.risk_level,
            profile_image_url: self.profile_image_url,
        })
    }

    pub fn to_preview(&self) -> PreviewRow {
        PreviewRow {
            name: self.name.clone(),
            class_name: self.class_name.clone(),
            attendance: format_percent(self.attendance),
            score_average: self.score_average,
            risk_level: self.risk_level,
        }
    }
}

// "-0" no ficheiro mostra-se como "0%"
fn format_percent(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{}%", value)
}

pub fn build_candidate(row: &CsvRow) -> StudentCandidate {
    let normalized = row.normalize();
    // O nível de risco é sempre calculado, nunca lido do ficheiro
    let risk_level = risk_service::classify(normalized.attendance, normalized.score_average);
    StudentCandidate {
        line: normalized.line,
        name: normalized.name,
        class_name: normalized.class_name,
        attendance: normalized.attendance,
        score_average: normalized.score_average,
        risk_level,
        profile_image_url: normalized.profile_image_url,
    }
}

/// Dry run: transforma o ficheiro sem gravar nada.
pub fn preview_students(bytes: &[u8]) -> AppResult<PreviewResponse> {
    let rows = csv_service::parse_csv(bytes)?;
    let preview = rows
        .iter()
        .take(PREVIEW_ROWS)
        .map(|row| build_candidate(row).to_preview())
        .collect();

    tracing::debug!("Preview de CSV gerado ({} linhas no total)", rows.len());
    Ok(PreviewResponse {
        preview,
        total_rows: rows.len(),
    })
}

/// Importa todas as linhas, pela ordem do ficheiro, uma a uma. Não existe
/// transação à volta do lote: o que foi gravado fica gravado.
pub async fn import_students(
    db_pool: &SqlitePool,
    bytes: &[u8],
    options: ImportOptions,
) -> AppResult<ImportReport> {
    let rows = csv_service::parse_csv(bytes)?;
    let total_rows = rows.len();
    tracing::info!("Importando CSV com {} linhas...", total_rows);

    let mut students = Vec::with_capacity(total_rows);
    let mut failed = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let row_number = index + 1;
        let candidate = build_candidate(row);
        let line = candidate.line;

        let new_student = match candidate.validate() {
            Ok(student) => student,
            Err(reason) => {
                tracing::warn!("Linha {} (linha {} do ficheiro) ignorada: {}", row_number, line, reason);
                failed.push(RowFailure { row: row_number, line, reason });
                continue;
            }
        };

        match student_service::create_student(db_pool, &new_student).await {
            Ok(student) => students.push(student),
            Err(e) if options.abort_on_storage_error => {
                tracing::error!(
                    "Importação abortada na linha {}: {:?} ({} alunos já gravados)",
                    row_number,
                    e,
                    students.len()
                );
                return Err(e);
            }
            Err(e) => {
                tracing::warn!("Falha ao gravar linha {}: {:?}", row_number, e);
                failed.push(RowFailure {
                    row: row_number,
                    line,
                    reason: "failed to save student".to_string(),
                });
            }
        }
    }

    let count = students.len();
    let message = if failed.is_empty() {
        format!("Successfully imported {} students", count)
    } else {
        format!(
            "Imported {} of {} students ({} rows skipped)",
            count,
            total_rows,
            failed.len()
        )
    };
    tracing::info!("✅ {}", message);

    Ok(ImportReport {
        message,
        count,
        total_rows,
        students,
        failed: options.report_failures.then_some(failed),
    })
}
