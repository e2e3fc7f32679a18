// src/error.rs
use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Erro na base de dados: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Erro de migração da base de dados: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Erro de configuração: {0}")]
    Config(String),

    // CSV com estrutura inválida (ex: número de colunas inconsistente)
    #[error("CSV inválido: {0}")]
    CsvError(#[from] csv::Error),

    #[error("CSV inválido: {0}")]
    MalformedCsv(String),

    #[error("Erro ao ler upload multipart: {0}")]
    MultipartError(#[from] MultipartError),

    #[error("Pedido inválido: {0}")]
    BadRequest(String),

    #[error("Não encontrado: {0}")]
    NotFound(String),

    #[error("Conflito: {0}")]
    Conflict(String),

    #[error("Erro ao processar password")]
    PasswordHashingError,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Erro na sessão: {0}")]
    SessionError(String),

    #[error("Erro interno inesperado")]
    InternalServerError,

    #[error("Não autorizado")]
    Unauthorized,
}

// Como converter AppError numa resposta HTTP: sempre JSON { "message": ... }
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Loga o erro detalhado no servidor
        match &self {
            AppError::SqlxError(_)
            | AppError::SqlxMigrateError(_)
            | AppError::Config(_)
            | AppError::PasswordHashingError
            | AppError::SessionError(_)
            | AppError::InternalServerError => tracing::error!("Erro processado: {:?}", self),
            _ => tracing::warn!("Pedido rejeitado: {}", self),
        }

        let (status, user_message) = match self {
            AppError::SqlxError(_) | AppError::SqlxMigrateError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to access data".to_string())
            }
            AppError::Config(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Configuration error".to_string())
            }
            AppError::CsvError(_) | AppError::MalformedCsv(_) => {
                (StatusCode::BAD_REQUEST, "Failed to process CSV file".to_string())
            }
            // O próprio erro sabe o status (ex: 413 quando passa o limite do body)
            AppError::MultipartError(e) => (e.status(), "Failed to read uploaded file".to_string()),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            // Mantido 400 por compatibilidade com o frontend
            AppError::Conflict(message) => (StatusCode::BAD_REQUEST, message),
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()) // Mensagem genérica
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::PasswordHashingError | AppError::SessionError(_) | AppError::InternalServerError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        (status, Json(json!({ "message": user_message }))).into_response()
    }
}

// Tipo Result padrão para a aplicação
pub type AppResult<T = ()> = Result<T, AppError>;
