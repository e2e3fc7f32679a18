// src/services/tracking_service.rs
// Alertas e intervenções registados pelos mentores.
use crate::{
    error::{AppError, AppResult},
    models::tracking::{Alert, AlertStatus, Intervention, InterventionOutcome},
};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Alertas de um aluno, mais recentes primeiro.
pub async fn get_alerts_by_student(db_pool: &SqlitePool, student_id: &str) -> AppResult<Vec<Alert>> {
    tracing::debug!("Buscando alertas do aluno {}", student_id);
    let alerts = sqlx::query_as::<_, Alert>(
        r#"
        SELECT id, student_id, reason, status, created_at
        FROM alerts
        WHERE student_id = ?1
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .bind(student_id)
    .fetch_all(db_pool)
    .await?;
    Ok(alerts)
}

pub async fn create_alert(
    db_pool: &SqlitePool,
    student_id: &str,
    reason: &str,
    status: AlertStatus,
) -> AppResult<Alert> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(AppError::BadRequest("Alert reason is required".to_string()));
    }

    let alert = Alert {
        id: Uuid::new_v4().to_string(),
        student_id: student_id.to_string(),
        reason: reason.to_string(),
        status,
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO alerts (id, student_id, reason, status, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(&alert.id)
    .bind(&alert.student_id)
    .bind(&alert.reason)
    .bind(alert.status.as_str())
    .bind(alert.created_at)
    .execute(db_pool)
    .await?;

    tracing::info!("⚠️ Alerta '{}' criado para aluno {}", alert.id, student_id);
    Ok(alert)
}

/// Intervenções de um aluno, mais recentes primeiro.
pub async fn get_interventions_by_student(
    db_pool: &SqlitePool,
    student_id: &str,
) -> AppResult<Vec<Intervention>> {
    tracing::debug!("Buscando intervenções do aluno {}", student_id);
    let interventions = sqlx::query_as::<_, Intervention>(
        r#"
        SELECT id, student_id, note, outcome, created_at
        FROM interventions
        WHERE student_id = ?1
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .bind(student_id)
    .fetch_all(db_pool)
    .await?;
    Ok(interventions)
}

pub async fn create_intervention(
    db_pool: &SqlitePool,
    student_id: &str,
    note: &str,
    outcome: InterventionOutcome,
) -> AppResult<Intervention> {
    let note = note.trim();
    if note.is_empty() {
        return Err(AppError::BadRequest("Intervention note is required".to_string()));
    }

    let intervention = Intervention {
        id: Uuid::new_v4().to_string(),
        student_id: student_id.to_string(),
        note: note.to_string(),
        outcome,
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO interventions (id, student_id, note, outcome, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(&intervention.id)
    .bind(&intervention.student_id)
    .bind(&intervention.note)
    .bind(intervention.outcome.as_str())
    .bind(intervention.created_at)
    .execute(db_pool)
    .await?;

    tracing::info!("✅ Intervenção '{}' registada para aluno {}", intervention.id, student_id);
    Ok(intervention)
}
