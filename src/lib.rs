//! Backend de ride-booking multi-tenant
//!
//! Núcleo: el motor de reconciliación de earnings de partners y el
//! protocolo de asignación de rides first-come-first-served, expuestos
//! por una API Axum sobre PostgreSQL.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
