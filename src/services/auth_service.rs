// src/services/auth_service.rs
// bcrypt é CPU-bound: hash e verificação correm no pool de threads bloqueantes.
use crate::error::{AppError, AppResult};
use bcrypt::BcryptError;

// Mesmo custo que as contas antigas (hashes compatíveis)
pub const BCRYPT_COST: u32 = 10;

async fn run_bcrypt<T, F>(operation: &'static str, job: F) -> AppResult<T>
where
    F: FnOnce() -> Result<T, BcryptError> + Send + 'static,
    T: Send + 'static,
{
    let outcome = tokio::task::spawn_blocking(job).await.map_err(|e| {
        tracing::error!("Task bcrypt ({}) interrompida: {:?}", operation, e);
        AppError::InternalServerError
    })?;
    outcome.map_err(|e| {
        tracing::error!("Erro bcrypt ({}): {}", operation, e);
        AppError::PasswordHashingError
    })
}

pub async fn hash_password(password: &str) -> AppResult<String> {
    let password = password.to_owned();
    run_bcrypt("hash", move || bcrypt::hash(password, BCRYPT_COST)).await
}

/// `Ok(false)` para senha errada; `Err` só quando o hash guardado é ilegível.
pub async fn verify_password(password: &str, stored_hash: &str) -> AppResult<bool> {
    let (password, stored_hash) = (password.to_owned(), stored_hash.to_owned());
    run_bcrypt("verify", move || bcrypt::verify(password, &stored_hash)).await
}
