// src/web/mw_auth.rs
use crate::{error::AppError, services::user_service, state::AppState};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tower_sessions::Session;

pub const SESSION_USER_KEY: &str = "user_id";

/// Identidade do mentor autenticado, válida só durante o pedido.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
}

// Middleware que verifica se o utilizador está logado. Sem sessão válida: 401 JSON.
pub async fn require_auth(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = match session.get::<String>(SESSION_USER_KEY).await {
        Ok(Some(user_id)) => user_id,
        Ok(None) => {
            tracing::debug!("Autenticação MW: Não autenticado (sem user_id).");
            return Err(AppError::Unauthorized);
        }
        Err(e) => {
            tracing::error!("Autenticação MW: Erro ao ler sessão: {:?}", e);
            return Err(AppError::SessionError(format!("Erro ao verificar sessão: {}", e)));
        }
    };

    // A conta pode ter sido apagada depois do login
    let Some(user) = user_service::find_user_by_id(&state.db_pool, &user_id).await? else {
        tracing::warn!("Autenticação MW: user_id '{}' da sessão não existe na DB.", user_id);
        return Err(AppError::Unauthorized);
    };

    tracing::debug!("Autenticação MW: Utilizador '{}' autenticado.", user.email);
    request.extensions_mut().insert(CurrentUser {
        id: user.id,
        email: user.email,
    });
    Ok(next.run(request).await)
}
