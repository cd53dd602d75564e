//! Modelo de Partner
//!
//! Este módulo contiene los structs Partner y FleetRequest.
//! El ledger financiero del partner vive en la misma fila:
//! online earnings alimentan el payout balance, cash earnings nunca
//! (el efectivo se liquida directamente entre partner y cliente).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Estados de aprobación de un partner
pub mod partner_status {
    pub const PENDING: &str = "pending";
    pub const APPROVED: &str = "approved";
    pub const REJECTED: &str = "rejected";
    pub const SUSPENDED: &str = "suspended";
}

/// Estados de una solicitud de flota
pub mod fleet_request_status {
    pub const PENDING: &str = "pending";
    pub const APPROVED: &str = "approved";
    pub const REJECTED: &str = "rejected";
}

/// Partner principal - mapea exactamente a la tabla partners
///
/// `ledger_version` guarda la escritura del ledger con concurrencia
/// optimista: reconciliar y limpiar payout incrementan la versión, y una
/// escritura con versión vieja no encuentra la fila.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Partner {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub status: String,
    pub is_active: bool,
    pub current_fleet_vehicle_id: Option<Uuid>,
    pub total_earnings: Decimal,
    pub online_earnings: Decimal,
    pub cash_earnings: Decimal,
    pub payout_balance: Decimal,
    pub last_payout_at: Option<DateTime<Utc>>,
    pub ledger_version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Partner {
    /// Un partner puede recibir y aceptar rides solo si está aprobado y activo
    pub fn is_eligible_for_rides(&self) -> bool {
        self.status == partner_status::APPROVED && self.is_active
    }

    /// Verificar que el vehículo de flota actual coincide con el solicitado
    pub fn operates_vehicle(&self, vehicle_type_id: Uuid) -> bool {
        self.current_fleet_vehicle_id == Some(vehicle_type_id)
    }
}

/// Solicitud de asignación de flota (legacy: la elegibilidad también acepta
/// solicitudes aprobadas de partners sin current_fleet_vehicle_id)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FleetRequest {
    pub id: Uuid,
    pub partner_id: Uuid,
    pub vehicle_type_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
