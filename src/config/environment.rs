//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    /// Código ISO de la moneda de la plataforma (ej. "EUR")
    pub currency_code: String,
    /// Minutos que una reserva permanece abierta para los partners
    pub acceptance_window_minutes: i64,
    /// Intervalo del job de reconciliación de earnings, en segundos
    pub reconcile_interval_secs: u64,
    /// Endpoint HTTP del servicio de correo
    pub mail_api_url: Option<String>,
    pub mail_api_key: Option<String>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().to_string())
                .collect(),
            currency_code: env::var("CURRENCY_CODE").unwrap_or_else(|_| "EUR".to_string()),
            acceptance_window_minutes: env::var("ACCEPTANCE_WINDOW_MINUTES")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("ACCEPTANCE_WINDOW_MINUTES must be a valid number"),
            reconcile_interval_secs: env::var("RECONCILE_INTERVAL_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .expect("RECONCILE_INTERVAL_SECS must be a valid number"),
            mail_api_url: env::var("MAIL_API_URL").ok(),
            mail_api_key: env::var("MAIL_API_KEY").ok(),
        }
    }
}

impl EnvironmentConfig {
    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
