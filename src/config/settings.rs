//! Configuración de moneda para formateo de importes
//!
//! La configuración se lee una vez y se pasa explícitamente a cada
//! operación que la necesita. No hay singleton global.

use serde::{Deserialize, Serialize};

/// Moneda de la plataforma, usada para mostrar importes a los partners
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencySettings {
    pub code: String,
}

impl Default for CurrencySettings {
    fn default() -> Self {
        Self {
            code: "EUR".to_string(),
        }
    }
}

impl CurrencySettings {
    pub fn new(code: impl Into<String>) -> Self {
        let code: String = code.into();
        if code.trim().is_empty() {
            return Self::default();
        }
        Self {
            code: code.to_uppercase(),
        }
    }

    /// Símbolo para mostrar; monedas desconocidas caen al símbolo del euro
    pub fn symbol(&self) -> &'static str {
        match self.code.as_str() {
            "USD" => "$",
            "GBP" => "£",
            "INR" => "₹",
            "EUR" => "€",
            _ => "€",
        }
    }
}
