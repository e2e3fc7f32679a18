// src/web/student_handlers.rs
use crate::{
    error::AppResult,
    models::student::{
        CreateStudentPayload, Student, StudentFilters, StudentQueryParams, StudentStats, UpdateStudentPayload,
    },
    services::student_service,
    state::AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

// GET /api/students?class=&riskLevel=&search=
pub async fn handle_list_students(
    State(state): State<AppState>,
    Query(params): Query<StudentQueryParams>,
) -> AppResult<Json<Vec<Student>>> {
    let filters = StudentFilters::from(params);
    let students = student_service::list_students(&state.db_pool, &filters).await?;
    Ok(Json(students))
}

// GET /api/students/stats
pub async fn handle_student_stats(State(state): State<AppState>) -> AppResult<Json<StudentStats>> {
    Ok(Json(student_service::get_student_stats(&state.db_pool).await?))
}

// GET /api/students/{id}
pub async fn handle_get_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> AppResult<Json<Student>> {
    Ok(Json(student_service::get_student(&state.db_pool, &student_id).await?))
}

// POST /api/students
pub async fn handle_create_student(
    State(state): State<AppState>,
    Json(payload): Json<CreateStudentPayload>,
) -> AppResult<impl IntoResponse> {
    let new_student = student_service::new_student_from_payload(payload)?;
    let student = student_service::create_student(&state.db_pool, &new_student).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

// PUT /api/students/{id}
pub async fn handle_update_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Json(payload): Json<UpdateStudentPayload>,
) -> AppResult<Json<Student>> {
    Ok(Json(student_service::update_student(&state.db_pool, &student_id, payload).await?))
}

// DELETE /api/students/{id}
pub async fn handle_delete_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> AppResult<StatusCode> {
    student_service::delete_student(&state.db_pool, &student_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
