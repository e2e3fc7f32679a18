// src/state.rs
use crate::{config::AppConfig, services::import_service::ImportOptions};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub import_options: ImportOptions,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, config: &AppConfig) -> Self {
        AppState {
            db_pool,
            import_options: config.import,
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

// Permite extrair o pool da DB diretamente
impl axum::extract::FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> SqlitePool {
        state.db_pool.clone()
    }
}
