// src/services/user_service.rs
use crate::{
    error::{AppError, AppResult},
    models::user::{RegisterPayload, User},
    services::auth_service,
};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Busca um mentor na base de dados pelo seu ID.
pub async fn find_user_by_id(db_pool: &SqlitePool, user_id: &str) -> AppResult<Option<User>> {
    tracing::debug!("Buscando utilizador por ID: {}", user_id);
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, first_name, last_name, created_at, updated_at
        FROM users
        WHERE id = ?1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db_pool)
    .await?;
    Ok(user)
}

/// Busca por email (a coluna é COLLATE NOCASE).
pub async fn find_user_by_email(db_pool: &SqlitePool, email: &str) -> AppResult<Option<User>> {
    tracing::debug!("Buscando utilizador por email: {}", email);
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, first_name, last_name, created_at, updated_at
        FROM users
        WHERE email = ?1
        "#,
    )
    .bind(email.trim())
    .fetch_optional(db_pool)
    .await?;

    if user.is_some() {
        tracing::debug!("Utilizador '{}' encontrado.", email);
    } else {
        tracing::debug!("Utilizador '{}' não encontrado.", email);
    }
    Ok(user)
}

pub async fn create_user(db_pool: &SqlitePool, payload: &RegisterPayload) -> AppResult<User> {
    let email = payload.email.trim();
    tracing::info!("Tentando criar utilizador: {}", email);

    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("A valid email is required".to_string()));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must have at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    if find_user_by_email(db_pool, email).await?.is_some() {
        tracing::warn!("Falha ao criar user: email '{}' já existe.", email);
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let password_hash = auth_service::hash_password(&payload.password).await?;
    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4().to_string(),
        email: email.to_string(),
        password_hash,
        first_name: payload.first_name.clone().filter(|v| !v.trim().is_empty()),
        last_name: payload.last_name.clone().filter(|v| !v.trim().is_empty()),
        created_at: now,
        updated_at: now,
    };

    let insert_result = sqlx::query(
        r#"
        INSERT INTO users (id, email, password_hash, first_name, last_name, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&user.id)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(db_pool)
    .await;

    // Dois registos em simultâneo com o mesmo email: o UNIQUE decide
    if let Err(sqlx::Error::Database(db_err)) = &insert_result {
        if db_err.is_unique_violation() {
            tracing::warn!("Falha ao criar user: email '{}' já existe.", email);
            return Err(AppError::Conflict("User already exists".to_string()));
        }
    }
    insert_result?;

    tracing::info!("✅ Utilizador '{}' criado com sucesso.", user.id);
    Ok(user)
}

/// Devolve o utilizador se o email e a senha coincidirem.
pub async fn authenticate(db_pool: &SqlitePool, email: &str, password: &str) -> AppResult<User> {
    let Some(user) = find_user_by_email(db_pool, email).await? else {
        tracing::warn!("Utilizador não encontrado: {}", email);
        return Err(AppError::InvalidCredentials);
    };

    tracing::debug!("Verificando senha do mentor {} ({})", user.id, user.email);
    if auth_service::verify_password(password, &user.password_hash).await? {
        Ok(user)
    } else {
        tracing::warn!("Senha incorreta para: {}", email);
        Err(AppError::InvalidCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn payload(email: &str) -> RegisterPayload {
        RegisterPayload {
            email: email.to_string(),
            password: "senha-segura".to_string(),
            first_name: Some("Ana".to_string()),
            last_name: None,
        }
    }

    #[tokio::test]
    async fn register_then_authenticate() {
        let pool = db::create_memory_pool().await.unwrap();
        let user = create_user(&pool, &payload("ana@escola.pt")).await.unwrap();

        let found = authenticate(&pool, "ANA@escola.pt", "senha-segura").await.unwrap();
        assert_eq!(found.id, user.id);
        assert!(matches!(
            authenticate(&pool, "ana@escola.pt", "errada").await,
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            authenticate(&pool, "ninguem@escola.pt", "senha-segura").await,
            Err(AppError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let pool = db::create_memory_pool().await.unwrap();
        create_user(&pool, &payload("ana@escola.pt")).await.unwrap();
        assert!(matches!(
            create_user(&pool, &payload("ana@escola.pt")).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let pool = db::create_memory_pool().await.unwrap();
        let mut p = payload("ana@escola.pt");
        p.password = "123".to_string();
        assert!(matches!(create_user(&pool, &p).await, Err(AppError::BadRequest(_))));
    }
}
