// src/models/tracking.rs
// Alertas, intervenções e séries históricas: tudo pertence a um aluno
// (ON DELETE CASCADE) e só guarda o student_id.
use super::UnknownVariant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    #[default]
    Active,
    Resolved,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Active => "active",
            AlertStatus::Resolved => "resolved",
        }
    }
}

impl FromStr for AlertStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AlertStatus::Active),
            "resolved" => Ok(AlertStatus::Resolved),
            other => Err(UnknownVariant { kind: "status", value: other.to_string() }),
        }
    }
}

impl TryFrom<String> for AlertStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionOutcome {
    #[default]
    InProgress,
    Completed,
    Cancelled,
}

impl InterventionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterventionOutcome::InProgress => "in_progress",
            InterventionOutcome::Completed => "completed",
            InterventionOutcome::Cancelled => "cancelled",
        }
    }
}

impl FromStr for InterventionOutcome {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(InterventionOutcome::InProgress),
            "completed" => Ok(InterventionOutcome::Completed),
            "cancelled" => Ok(InterventionOutcome::Cancelled),
            other => Err(UnknownVariant { kind: "outcome", value: other.to_string() }),
        }
    }
}

impl TryFrom<String> for InterventionOutcome {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// --- Tabelas ---

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub student_id: String,
    pub reason: String,
    #[sqlx(try_from = "String")]
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intervention {
    pub id: String,
    pub student_id: String,
    pub note: String,
    #[sqlx(try_from = "String")]
    pub outcome: InterventionOutcome,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreHistory {
    pub id: String,
    pub student_id: String,
    pub score: f64,
    pub subject: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceHistory {
    pub id: String,
    pub student_id: String,
    pub attendance_rate: f64,
    pub created_at: DateTime<Utc>,
}

// --- Payloads da API (o student_id vem sempre do path) ---

#[derive(Debug, Deserialize)]
pub struct CreateAlertPayload {
    pub reason: String,
    #[serde(default)]
    pub status: Option<AlertStatus>,
}

#[derive(Debug, Deserialize)]
pub struct CreateInterventionPayload {
    pub note: String,
    #[serde(default)]
    pub outcome: Option<InterventionOutcome>,
}

#[derive(Debug, Deserialize)]
pub struct AddScorePayload {
    pub score: f64,
    #[serde(default)]
    pub subject: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddAttendancePayload {
    pub attendance_rate: f64,
}
