//! Utilidades del sistema
//!
//! Este módulo contiene utilidades compartidas: manejo de errores
//! y helpers de validación.

pub mod errors;
pub mod validation;
