// src/config.rs
// Configuração lida do ambiente (.env carregado pelo dotenvy no main).
use crate::{
    error::{AppError, AppResult},
    services::import_service::ImportOptions,
};
use std::{net::SocketAddr, str::FromStr};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
// Exigido pela chave de assinatura do cookie de sessão
pub const MIN_SESSION_SECRET_LEN: usize = 64;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub session_secret: String,
    pub bind_addr: SocketAddr,
    pub max_upload_bytes: usize,
    pub import: ImportOptions,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Constrói a configuração a partir de uma função de lookup (o ambiente, ou um mapa nos testes).
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AppError::Config(format!("variável {} não definida", key)))
        };

        let database_url = required("DATABASE_URL")?;
        let session_secret = required("SESSION_SECRET")?;
        if session_secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(AppError::Config(format!(
                "SESSION_SECRET precisa de pelo menos {} bytes",
                MIN_SESSION_SECRET_LEN
            )));
        }

        let bind_addr = parse_or("BIND_ADDR", lookup("BIND_ADDR"), DEFAULT_BIND_ADDR.parse().ok())?;
        let max_upload_bytes =
            parse_or("MAX_UPLOAD_BYTES", lookup("MAX_UPLOAD_BYTES"), Some(DEFAULT_MAX_UPLOAD_BYTES))?;

        let defaults = ImportOptions::default();
        let import = ImportOptions {
            abort_on_storage_error: parse_flag(
                "IMPORT_ABORT_ON_STORAGE_ERROR",
                lookup("IMPORT_ABORT_ON_STORAGE_ERROR"),
                defaults.abort_on_storage_error,
            )?,
            report_failures: parse_flag(
                "IMPORT_REPORT_FAILURES",
                lookup("IMPORT_REPORT_FAILURES"),
                defaults.report_failures,
            )?,
        };

        Ok(AppConfig {
            database_url,
            session_secret,
            bind_addr,
            max_upload_bytes,
            import,
        })
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: Option<T>) -> AppResult<T> {
    match raw.filter(|v| !v.trim().is_empty()) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("valor inválido para {}: '{}'", key, value))),
        None => default.ok_or_else(|| AppError::Config(format!("variável {} não definida", key))),
    }
}

fn parse_flag(key: &str, raw: Option<String>, default: bool) -> AppResult<bool> {
    let Some(value) = raw.filter(|v| !v.trim().is_empty()) else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::Config(format!("valor booleano inválido para {}: '{}'", key, value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppResult<AppConfig> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    fn long_secret() -> String {
        "x".repeat(MIN_SESSION_SECRET_LEN)
    }

    #[test]
    fn defaults_apply_when_optional_vars_are_missing() {
        let secret = long_secret();
        let config = config_from(&[("DATABASE_URL", "sqlite://monitor.db"), ("SESSION_SECRET", &secret)]).unwrap();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert!(!config.import.abort_on_storage_error);
        assert!(config.import.report_failures);
    }

    #[test]
    fn short_session_secret_is_rejected() {
        let err = config_from(&[("DATABASE_URL", "sqlite://monitor.db"), ("SESSION_SECRET", "curta")]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn missing_database_url_is_rejected() {
        let secret = long_secret();
        assert!(matches!(config_from(&[("SESSION_SECRET", &secret)]), Err(AppError::Config(_))));
    }

    #[test]
    fn import_flags_and_limits_are_parsed() {
        let secret = long_secret();
        let config = config_from(&[
            ("DATABASE_URL", "sqlite://monitor.db"),
            ("SESSION_SECRET", &secret),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("MAX_UPLOAD_BYTES", "1024"),
            ("IMPORT_ABORT_ON_STORAGE_ERROR", "true"),
            ("IMPORT_REPORT_FAILURES", "0"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.max_upload_bytes, 1024);
        assert!(config.import.abort_on_storage_error);
        assert!(!config.import.report_failures);
    }

    #[test]
    fn malformed_values_are_config_errors() {
        let secret = long_secret();
        let err = config_from(&[
            ("DATABASE_URL", "sqlite://monitor.db"),
            ("SESSION_SECRET", &secret),
            ("IMPORT_REPORT_FAILURES", "talvez"),
        ])
        .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
