//! Configuración de la aplicación

pub mod environment;
pub mod settings;
