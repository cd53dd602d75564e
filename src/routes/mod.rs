//! Routers de la API, uno por superficie

pub mod admin_routes;
pub mod booking_routes;
pub mod partner_routes;
