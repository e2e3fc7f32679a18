// src/web/tracking_handlers.rs
// Alertas, intervenções e histórico de um aluno (/api/students/{id}/...).
// Todos os handlers confirmam primeiro que o aluno existe (404 se não).
use crate::{
    error::{AppError, AppResult},
    models::tracking::{
        AddAttendancePayload, AddScorePayload, Alert, AttendanceHistory, CreateAlertPayload,
        CreateInterventionPayload, Intervention, ScoreHistory,
    },
    services::{history_service, student_service, tracking_service},
    state::AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};

// Corpo JSON inválido é 400, não o 422 por omissão do axum
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

// --- Alertas ---

pub async fn handle_list_alerts(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> AppResult<Json<Vec<Alert>>> {
    student_service::get_student(&state.db_pool, &student_id).await?;
    Ok(Json(tracking_service::get_alerts_by_student(&state.db_pool, &student_id).await?))
}

pub async fn handle_create_alert(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    payload: Result<Json<CreateAlertPayload>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    student_service::get_student(&state.db_pool, &student_id).await?;
    let payload = json_body(payload)?;
    let alert = tracking_service::create_alert(
        &state.db_pool,
        &student_id,
        &payload.reason,
        payload.status.unwrap_or_default(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(alert)))
}

// --- Intervenções ---

pub async fn handle_list_interventions(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> AppResult<Json<Vec<Intervention>>> {
    student_service::get_student(&state.db_pool, &student_id).await?;
    Ok(Json(tracking_service::get_interventions_by_student(&state.db_pool, &student_id).await?))
}

pub async fn handle_create_intervention(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    payload: Result<Json<CreateInterventionPayload>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    student_service::get_student(&state.db_pool, &student_id).await?;
    let payload = json_body(payload)?;
    let intervention = tracking_service::create_intervention(
        &state.db_pool,
        &student_id,
        &payload.note,
        payload.outcome.unwrap_or_default(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(intervention)))
}

// --- Histórico (gráficos) ---

pub async fn handle_score_history(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> AppResult<Json<Vec<ScoreHistory>>> {
    student_service::get_student(&state.db_pool, &student_id).await?;
    Ok(Json(history_service::get_score_history(&state.db_pool, &student_id).await?))
}

pub async fn handle_add_score(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    payload: Result<Json<AddScorePayload>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    student_service::get_student(&state.db_pool, &student_id).await?;
    let payload = json_body(payload)?;
    let subject = payload.subject.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let point = history_service::add_score_point(&state.db_pool, &student_id, payload.score, subject).await?;
    Ok((StatusCode::CREATED, Json(point)))
}

pub async fn handle_attendance_history(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> AppResult<Json<Vec<AttendanceHistory>>> {
    student_service::get_student(&state.db_pool, &student_id).await?;
    Ok(Json(history_service::get_attendance_history(&state.db_pool, &student_id).await?))
}

pub async fn handle_add_attendance(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    payload: Result<Json<AddAttendancePayload>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    student_service::get_student(&state.db_pool, &student_id).await?;
    let payload = json_body(payload)?;
    let point =
        history_service::add_attendance_point(&state.db_pool, &student_id, payload.attendance_rate).await?;
    Ok((StatusCode::CREATED, Json(point)))
}
