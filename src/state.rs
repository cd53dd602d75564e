//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::config::settings::CurrencySettings;
use crate::services::notification::{EmailNotifier, NoopNotifier, NotificationDispatcher};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub notifier: Arc<dyn NotificationDispatcher>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let notifier: Arc<dyn NotificationDispatcher> =
            match (&config.mail_api_url, &config.mail_api_key) {
                (Some(url), Some(key)) => Arc::new(EmailNotifier::new(url.clone(), key.clone())),
                _ => Arc::new(NoopNotifier),
            };
        Self {
            pool,
            config,
            notifier,
        }
    }

    /// Moneda de la plataforma, leída una vez de la configuración y pasada
    /// explícitamente a cada operación
    pub fn currency(&self) -> CurrencySettings {
        CurrencySettings::new(self.config.currency_code.clone())
    }
}
