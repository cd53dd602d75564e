//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y generación de códigos de viaje.

use chrono::{NaiveDate, NaiveTime};
use rand::Rng;
use validator::ValidationError;

/// Validar que una fecha de reserva tenga el formato YYYY-MM-DD
///
/// El motor de earnings compara fechas como strings en este formato,
/// por lo que todo lo que entra al sistema debe cumplirlo.
pub fn validate_booking_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar y convertir string a hora de recogida (HH:MM)
pub fn validate_booking_time(value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| {
        let mut error = ValidationError::new("time");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"HH:MM".to_string());
        error
    })
}

/// Generar un código de viaje corto y legible (ej. "TRP-8F3K2A")
pub fn generate_trip_code() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..6)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect();
    format!("TRP-{}", suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_booking_date() {
        assert!(validate_booking_date("2026-03-15").is_ok());
        assert!(validate_booking_date("15-03-2026").is_err());
        assert!(validate_booking_date("2026-3-15").is_err());
        assert!(validate_booking_date("").is_err());
    }

    #[test]
    fn test_validate_booking_time() {
        assert!(validate_booking_time("14:30").is_ok());
        assert!(validate_booking_time("25:00").is_err());
        assert!(validate_booking_time("").is_err());
    }

    #[test]
    fn test_generate_trip_code_format() {
        let code = generate_trip_code();
        assert!(code.starts_with("TRP-"));
        assert_eq!(code.len(), 10);
        // Sin caracteres ambiguos (0, O, 1, I, L)
        for c in code[4..].chars() {
            assert!(!"0O1IL".contains(c), "ambiguous char {} in {}", c, code);
        }
    }
}
