//! DTOs de la API

pub mod booking_dto;
pub mod common;
pub mod partner_dto;
