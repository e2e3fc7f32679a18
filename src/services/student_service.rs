// src/services/student_service.rs
use crate::{
    error::{AppError, AppResult},
    models::student::{
        CreateStudentPayload, NewStudent, Student, StudentFilters, StudentStats, UpdateStudentPayload,
    },
    services::{history_service, risk_service},
};
use chrono::Utc;
use sqlx::{Executor, QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

const STUDENT_COLUMNS: &str =
    "id, name, class, attendance, score_average, risk_level, profile_image_url, created_at, updated_at";

/// Busca um aluno pelo ID. Aceita o pool ou uma transação aberta.
pub async fn find_student_by_id<'e, E>(executor: E, student_id: &str) -> AppResult<Option<Student>>
where
    E: Executor<'e, Database = Sqlite>,
{
    tracing::debug!("Buscando aluno por ID: {}", student_id);
    let student = sqlx::query_as::<_, Student>(&format!(
        "SELECT {} FROM students WHERE id = ?1",
        STUDENT_COLUMNS
    ))
    .bind(student_id)
    .fetch_optional(executor)
    .await?;
    Ok(student)
}

/// Como `find_student_by_id`, mas um aluno inexistente é 404.
pub async fn get_student<'e, E>(executor: E, student_id: &str) -> AppResult<Student>
where
    E: Executor<'e, Database = Sqlite>,
{
    find_student_by_id(executor, student_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".to_string()))
}

/// Lista os alunos que cumprem todos os filtros fornecidos, ordenados por nome.
///
/// Turma e risco filtram no SQL. A pesquisa por nome é feita aqui, porque o
/// LIKE do SQLite só ignora maiúsculas em ASCII ("Álvaro" vs "álvaro").
/// Sem paginação: tudo o que corresponder vem numa só resposta.
pub async fn list_students(db_pool: &SqlitePool, filters: &StudentFilters) -> AppResult<Vec<Student>> {
    tracing::debug!("Listando alunos com filtros {:?}", filters);
    let mut query: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {} FROM students WHERE 1 = 1", STUDENT_COLUMNS));

    if let Some(class_name) = &filters.class_name {
        query.push(" AND class = ").push_bind(class_name.clone());
    }
    if let Some(risk_level) = filters.risk_level {
        query.push(" AND risk_level = ").push_bind(risk_level.as_str());
    }
    query.push(" ORDER BY name ASC");

    let mut students = query.build_query_as::<Student>().fetch_all(db_pool).await?;
    if let Some(search) = &filters.search {
        let needle = search.to_lowercase();
        students.retain(|student| student.name.to_lowercase().contains(&needle));
    }
    tracing::debug!("Encontrados {} alunos.", students.len());
    Ok(students)
}

/// Grava um aluno novo e o primeiro ponto de cada série histórica, tudo numa
/// transação (a linha fica completa ou não fica).
pub async fn create_student(db_pool: &SqlitePool, new_student: &NewStudent) -> AppResult<Student> {
    let now = Utc::now();
    let student = Student {
        id: Uuid::new_v4().to_string(),
        name: new_student.name.clone(),
        class_name: new_student.class_name.clone(),
        attendance: new_student.attendance,
        score_average: new_student.score_average,
        risk_level: new_student.risk_level,
        profile_image_url: new_student.profile_image_url.clone(),
        created_at: now,
        updated_at: now,
    };

    let mut tx = db_pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO students (id, name, class, attendance, score_average, risk_level, profile_image_url, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(&student.id)
    .bind(&student.name)
    .bind(&student.class_name)
    .bind(student.attendance)
    .bind(student.score_average)
    .bind(student.risk_level.as_str())
    .bind(&student.profile_image_url)
    .bind(student.created_at)
    .bind(student.updated_at)
    .execute(&mut *tx)
    .await?;

    history_service::add_score_point(&mut *tx, &student.id, student.score_average, None).await?;
    history_service::add_attendance_point(&mut *tx, &student.id, student.attendance).await?;

    tx.commit().await?;
    tracing::info!("✅ Aluno '{}' ({}) criado com risco {}", student.name, student.id, student.risk_level);
    Ok(student)
}

/// Valida o corpo de POST /api/students. O risco é calculado quando não vem no pedido.
pub fn new_student_from_payload(payload: CreateStudentPayload) -> AppResult<NewStudent> {
    let name = required_text("name", &payload.name)?;
    let class_name = required_text("class", &payload.class_name)?;
    ensure_finite("attendance", payload.attendance)?;
    ensure_finite("scoreAverage", payload.score_average)?;

    let risk_level = payload
        .risk_level
        .unwrap_or_else(|| risk_service::classify(payload.attendance, payload.score_average));

    Ok(NewStudent {
        name,
        class_name,
        attendance: payload.attendance,
        score_average: payload.score_average,
        risk_level,
        profile_image_url: payload.profile_image_url.filter(|url| !url.trim().is_empty()),
    })
}

/// Atualização parcial. Se a assiduidade ou a média mudarem e o pedido não
/// trouxer `riskLevel`, o risco é recalculado; os valores novos entram no histórico.
pub async fn update_student(
    db_pool: &SqlitePool,
    student_id: &str,
    payload: UpdateStudentPayload,
) -> AppResult<Student> {
    tracing::info!("Atualizando dados do aluno: {}", student_id);
    let mut tx = db_pool.begin().await?;

    // Escrita sem efeito só para obter já o lock de escrita: um PUT concorrente
    // espera (busy_timeout) e depois lê o que este gravou
    sqlx::query("UPDATE students SET updated_at = updated_at WHERE id = ?1")
        .bind(student_id)
        .execute(&mut *tx)
        .await?;
    let mut student = get_student(&mut *tx, student_id).await?;

    if let Some(name) = &payload.name {
        student.name = required_text("name", name)?;
    }
    if let Some(class_name) = &payload.class_name {
        student.class_name = required_text("class", class_name)?;
    }

    let new_attendance = payload.attendance.filter(|value| *value != student.attendance);
    let new_score = payload.score_average.filter(|value| *value != student.score_average);
    if let Some(attendance) = new_attendance {
        ensure_finite("attendance", attendance)?;
        student.attendance = attendance;
    }
    if let Some(score) = new_score {
        ensure_finite("scoreAverage", score)?;
        student.score_average = score;
    }

    student.risk_level = match payload.risk_level {
        Some(level) => level,
        None if new_attendance.is_some() || new_score.is_some() => {
            risk_service::classify(student.attendance, student.score_average)
        }
        None => student.risk_level,
    };
    if let Some(url) = payload.profile_image_url {
        student.profile_image_url = Some(url).filter(|u| !u.trim().is_empty());
    }
    student.updated_at = Utc::now();

    sqlx::query(
        r#"
        UPDATE students
        SET
            name = ?1,
            class = ?2,
            attendance = ?3,
            score_average = ?4,
            risk_level = ?5,
            profile_image_url = ?6,
            updated_at = ?7
        WHERE id = ?8
        "#,
    )
    .bind(&student.name)
    .bind(&student.class_name)
    .bind(student.attendance)
    .bind(student.score_average)
    .bind(student.risk_level.as_str())
    .bind(&student.profile_image_url)
    .bind(student.updated_at)
    .bind(&student.id)
    .execute(&mut *tx)
    .await?;

    if let Some(score) = new_score {
        history_service::add_score_point(&mut *tx, &student.id, score, None).await?;
    }
    if let Some(attendance) = new_attendance {
        history_service::add_attendance_point(&mut *tx, &student.id, attendance).await?;
    }
    tx.commit().await?;

    tracing::info!("✅ Aluno {} atualizado (risco {})", student.id, student.risk_level);
    Ok(student)
}

/// Apaga o aluno; alertas, intervenções e histórico saem por cascata.
pub async fn delete_student(db_pool: &SqlitePool, student_id: &str) -> AppResult<()> {
    let rows_affected = sqlx::query("DELETE FROM students WHERE id = ?1")
        .bind(student_id)
        .execute(db_pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        tracing::warn!("Falha ao apagar: aluno '{}' não encontrado.", student_id);
        return Err(AppError::NotFound("Student not found".to_string()));
    }
    tracing::info!("🗑️ Aluno {} apagado.", student_id);
    Ok(())
}

/// Contagens por nível de risco numa única passagem pela tabela.
pub async fn get_student_stats(db_pool: &SqlitePool) -> AppResult<StudentStats> {
    let stats = sqlx::query_as::<_, StudentStats>(
        r#"
        SELECT
            COALESCE(SUM(CASE WHEN risk_level = 'low' THEN 1 ELSE 0 END), 0) AS low_risk,
            COALESCE(SUM(CASE WHEN risk_level = 'medium' THEN 1 ELSE 0 END), 0) AS medium_risk,
            COALESCE(SUM(CASE WHEN risk_level = 'high' THEN 1 ELSE 0 END), 0) AS high_risk,
            COUNT(*) AS total
        FROM students
        "#,
    )
    .fetch_one(db_pool)
    .await?;
    tracing::debug!("Estatísticas de risco: {:?}", stats);
    Ok(stats)
}

fn required_text(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("Field '{}' is required", field)));
    }
    Ok(value.to_string())
}

fn ensure_finite(field: &str, value: f64) -> AppResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("Field '{}' must be a number", field)))
    }
}
