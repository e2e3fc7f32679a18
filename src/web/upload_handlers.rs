// src/web/upload_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::import::{ImportReport, PreviewResponse},
    services::import_service,
    state::AppState,
    web::mw_auth::CurrentUser,
};
use axum::extract::{multipart::MultipartRejection, Extension, Json, Multipart, State};

/// Nome do campo do formulário multipart com o ficheiro.
pub const CSV_FIELD: &str = "csvFile";

fn is_csv_mime(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("text/csv"))
}

/// Extrai os bytes do campo `csvFile`. Rejeita outros tipos MIME antes de
/// chegar ao pipeline.
async fn read_csv_upload(multipart: Result<Multipart, MultipartRejection>) -> AppResult<Vec<u8>> {
    let Ok(mut multipart) = multipart else {
        return Err(AppError::BadRequest("No file uploaded".to_string()));
    };

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(CSV_FIELD) {
            continue;
        }
        if !is_csv_mime(field.content_type()) {
            tracing::warn!("Upload rejeitado: tipo {:?}", field.content_type());
            return Err(AppError::BadRequest("Only CSV files are allowed".to_string()));
        }
        let file_name = field.file_name().unwrap_or("(sem nome)").to_string();
        let bytes = field.bytes().await?;
        tracing::debug!("Ficheiro '{}' recebido ({} bytes)", file_name, bytes.len());
        return Ok(bytes.to_vec());
    }

    Err(AppError::BadRequest("No file uploaded".to_string()))
}

// POST /api/upload/csv
pub async fn handle_upload_csv(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<ImportReport>> {
    let bytes = read_csv_upload(multipart).await?;
    tracing::info!("📥 Importação de CSV pedida por {}", current_user.email);
    let report = import_service::import_students(&state.db_pool, &bytes, state.import_options).await?;
    Ok(Json(report))
}

// POST /api/upload/csv/preview
pub async fn handle_preview_csv(multipart: Result<Multipart, MultipartRejection>) -> AppResult<Json<PreviewResponse>> {
    let bytes = read_csv_upload(multipart).await?;
    Ok(Json(import_service::preview_students(&bytes)?))
}
