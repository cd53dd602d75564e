//! Controladores de la aplicación
//!
//! Orquestan validación, repositorios y servicios para cada recurso.

pub mod booking_controller;
pub mod partner_controller;
pub mod payout_controller;
