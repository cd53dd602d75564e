//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación: el motor
//! puro de earnings, su orquestación con persistencia, el protocolo de
//! asignación de rides y el despacho de notificaciones.

pub mod assignment;
pub mod earnings;
pub mod notification;
pub mod reconciliation;
