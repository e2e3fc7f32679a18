// src/web/auth_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::user::{LoginPayload, RegisterPayload, User},
    services::user_service,
    state::AppState,
    web::mw_auth::{CurrentUser, SESSION_USER_KEY},
};
use axum::{
    extract::{Extension, Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tower_sessions::Session;

// Gera novo ID de sessão e guarda o utilizador
async fn start_session(session: &Session, user: &User) -> AppResult<()> {
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao rodar ID: {}", e)))?;
    session
        .insert(SESSION_USER_KEY, &user.id)
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao inserir na sessão: {}", e)))
}

// POST /api/register
pub async fn handle_register(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<RegisterPayload>,
) -> AppResult<impl IntoResponse> {
    let user = user_service::create_user(&state.db_pool, &payload).await?;
    start_session(&session, &user).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

// POST /api/login
pub async fn handle_login(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginPayload>,
) -> AppResult<Json<User>> {
    tracing::info!("Tentativa de login para: {}", payload.email);
    let user = user_service::authenticate(&state.db_pool, &payload.email, &payload.password).await?;
    start_session(&session, &user).await?;
    tracing::info!("✅ Login bem-sucedido para: {}", user.id);
    Ok(Json(user))
}

// POST /api/logout
pub async fn handle_logout(session: Session) -> AppResult<impl IntoResponse> {
    let user_id: Option<String> = session.get(SESSION_USER_KEY).await.ok().flatten();

    // Apaga todos os dados da sessão atual
    session
        .delete()
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao apagar sessão: {}", e)))?;

    match user_id {
        Some(id) => tracing::info!("🚪 Utilizador '{}' desligado.", id),
        None => tracing::info!("🚪 Sessão anónima desligada."),
    }
    Ok(Json(json!({ "message": "Logged out successfully" })))
}

// GET /api/auth/user (protegido pelo middleware)
pub async fn handle_current_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<User>> {
    let user = user_service::find_user_by_id(&state.db_pool, &current_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(user))
}
