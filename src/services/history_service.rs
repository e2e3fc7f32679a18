// src/services/history_service.rs
// Pontos das séries de notas e assiduidade usadas nos gráficos de tendência.
use crate::{
    error::AppResult,
    models::tracking::{AttendanceHistory, ScoreHistory},
};
use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};
use uuid::Uuid;

/// Acrescenta um ponto à série de notas. Aceita o pool ou uma transação aberta.
pub async fn add_score_point<'e, E>(
    executor: E,
    student_id: &str,
    score: f64,
    subject: Option<&str>,
) -> AppResult<ScoreHistory>
where
    E: Executor<'e, Database = Sqlite>,
{
    let point = ScoreHistory {
        id: Uuid::new_v4().to_string(),
        student_id: student_id.to_string(),
        score,
        subject: subject.map(str::to_string),
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO score_history (id, student_id, score, subject, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(&point.id)
    .bind(&point.student_id)
    .bind(point.score)
    .bind(&point.subject)
    .bind(point.created_at)
    .execute(executor)
    .await?;

    tracing::debug!("Ponto de nota {} registado para aluno {}", point.score, student_id);
    Ok(point)
}

pub async fn add_attendance_point<'e, E>(
    executor: E,
    student_id: &str,
    attendance_rate: f64,
) -> AppResult<AttendanceHistory>
where
    E: Executor<'e, Database = Sqlite>,
{
    let point = AttendanceHistory {
        id: Uuid::new_v4().to_string(),
        student_id: student_id.to_string(),
        attendance_rate,
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO attendance_history (id, student_id, attendance_rate, created_at)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(&point.id)
    .bind(&point.student_id)
    .bind(point.attendance_rate)
    .bind(point.created_at)
    .execute(executor)
    .await?;

    tracing::debug!("Ponto de assiduidade {} registado para aluno {}", attendance_rate, student_id);
    Ok(point)
}

/// Série de notas, da mais antiga para a mais recente.
pub async fn get_score_history(db_pool: &SqlitePool, student_id: &str) -> AppResult<Vec<ScoreHistory>> {
    let points = sqlx::query_as::<_, ScoreHistory>(
        r#"
        SELECT id, student_id, score, subject, created_at
        FROM score_history
        WHERE student_id = ?1
        ORDER BY created_at ASC, rowid ASC
        "#,
    )
    .bind(student_id)
    .fetch_all(db_pool)
    .await?;
    Ok(points)
}

/// Série de assiduidade, da mais antiga para a mais recente.
pub async fn get_attendance_history(
    db_pool: &SqlitePool,
    student_id: &str,
) -> AppResult<Vec<AttendanceHistory>> {
    let points = sqlx::query_as::<_, AttendanceHistory>(
        r#"
        SELECT id, student_id, attendance_rate, created_at
        FROM attendance_history
        WHERE student_id = ?1
        ORDER BY created_at ASC, rowid ASC
        "#,
    )
    .bind(student_id)
    .fetch_all(db_pool)
    .await?;
    Ok(points)
}
