// src/services/risk_service.rs
use crate::models::student::RiskLevel;

/// Abaixo disto (em qualquer das métricas) o aluno é risco alto.
pub const HIGH_RISK_THRESHOLD: f64 = 60.0;
/// Assiduidade abaixo disto é risco médio.
pub const MEDIUM_ATTENDANCE_THRESHOLD: f64 = 75.0;
/// Média abaixo disto é risco médio.
pub const MEDIUM_SCORE_THRESHOLD: f64 = 70.0;

/// Classifica um aluno pela assiduidade (%) e média.
///
/// O alto é verificado antes do médio. Os valores não são limitados a
/// [0, 100]; quem chama garante que nunca chega NaN (texto inválido já
/// foi convertido em 0, que dá sempre risco alto).
pub fn classify(attendance_rate: f64, score_average: f64) -> RiskLevel {
    if attendance_rate < HIGH_RISK_THRESHOLD || score_average < HIGH_RISK_THRESHOLD {
        RiskLevel::High
    } else if attendance_rate < MEDIUM_ATTENDANCE_THRESHOLD || score_average < MEDIUM_SCORE_THRESHOLD {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_follow_thresholds() {
        assert_eq!(classify(59.9, 100.0), RiskLevel::High);
        assert_eq!(classify(60.0, 70.0), RiskLevel::Medium);
        assert_eq!(classify(75.0, 70.0), RiskLevel::Low);
        assert_eq!(classify(74.9, 70.0), RiskLevel::Medium);
        assert_eq!(classify(100.0, 59.9), RiskLevel::High);
        assert_eq!(classify(100.0, 69.9), RiskLevel::Medium);
        assert_eq!(classify(100.0, 70.0), RiskLevel::Low);
    }

    #[test]
    fn high_wins_over_medium() {
        // Assiduidade em zona média, média em zona alta
        assert_eq!(classify(70.0, 10.0), RiskLevel::High);
    }

    #[test]
    fn zero_is_always_high() {
        assert_eq!(classify(0.0, 100.0), RiskLevel::High);
        assert_eq!(classify(100.0, 0.0), RiskLevel::High);
    }

    #[test]
    fn out_of_range_values_are_not_clamped() {
        assert_eq!(classify(-5.0, 90.0), RiskLevel::High);
        assert_eq!(classify(250.0, 130.0), RiskLevel::Low);
    }
}
