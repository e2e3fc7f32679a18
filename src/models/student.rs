// src/models/student.rs
use super::UnknownVariant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{fmt, str::FromStr};

/// Nível de risco de um aluno. Sempre derivado da assiduidade e da média,
/// exceto quando sobrescrito explicitamente pela API de atualização.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RiskLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| UnknownVariant { kind: "risk_level", value: s.to_string() })
    }
}

// Usado pelo FromRow (#[sqlx(try_from = "String")])
impl TryFrom<String> for RiskLevel {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// --- Estrutura que espelha a tabela `students` ---

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String, // UUID v4
    pub name: String,
    #[serde(rename = "class")]
    #[sqlx(rename = "class")]
    pub class_name: String, // Texto livre, ex: "10A"
    pub attendance: f64,    // Percentagem, sem clamp a [0, 100]
    pub score_average: f64,
    #[sqlx(try_from = "String")]
    pub risk_level: RiskLevel,
    pub profile_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Aluno validado, pronto a inserir (sem id nem timestamps).
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub name: String,
    pub class_name: String,
    pub attendance: f64,
    pub score_average: f64,
    pub risk_level: RiskLevel,
    pub profile_image_url: Option<String>,
}

/// Corpo JSON de POST /api/students.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentPayload {
    pub name: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub attendance: f64,
    pub score_average: f64,
    #[serde(default)]
    pub risk_level: Option<RiskLevel>, // Calculado quando omitido
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

/// Corpo JSON de PUT /api/students/{id}. Todos os campos são opcionais.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentPayload {
    pub name: Option<String>,
    #[serde(rename = "class")]
    pub class_name: Option<String>,
    pub attendance: Option<f64>,
    pub score_average: Option<f64>,
    pub risk_level: Option<RiskLevel>,
    pub profile_image_url: Option<String>,
}

// --- Filtros da listagem ---

/// Parâmetros crus de GET /api/students (?class=&riskLevel=&search=).
#[derive(Debug, Default, Deserialize)]
pub struct StudentQueryParams {
    pub class: Option<String>,
    #[serde(rename = "riskLevel")]
    pub risk_level: Option<String>,
    pub search: Option<String>,
}

/// Critérios já normalizados. Cada `None` não impõe restrição; os `Some`
/// combinam-se com AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentFilters {
    pub class_name: Option<String>,
    pub risk_level: Option<RiskLevel>,
    pub search: Option<String>,
}

impl From<StudentQueryParams> for StudentFilters {
    // Valores vazios ou inválidos são ignorados (filtro permissivo)
    fn from(params: StudentQueryParams) -> Self {
        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());

        let risk_level = non_empty(params.risk_level).and_then(|raw| match raw.parse() {
            Ok(level) => Some(level),
            Err(e) => {
                tracing::debug!("Filtro riskLevel ignorado: {}", e);
                None
            }
        });

        StudentFilters {
            class_name: non_empty(params.class),
            risk_level,
            search: non_empty(params.search),
        }
    }
}

/// Contagens por nível de risco (GET /api/students/stats).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStats {
    pub low_risk: i64,
    pub medium_risk: i64,
    pub high_risk: i64,
    pub total: i64,
}
