//! Modelo de Booking
//!
//! Este módulo contiene el struct Booking y sus constantes de estado.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Estados de ciclo de vida de una reserva
pub mod booking_status {
    pub const UPCOMING: &str = "upcoming";
    pub const COMPLETED: &str = "completed";
    pub const CANCELED: &str = "canceled";
}

/// Métodos de pago
pub mod payment_method {
    pub const CASH: &str = "cash";
    pub const ONLINE: &str = "online";
}

/// Estados de pago
pub mod payment_status {
    pub const PENDING: &str = "pending";
    pub const COMPLETED: &str = "completed";
    pub const FAILED: &str = "failed";
    pub const REFUNDED: &str = "refunded";
}

/// Booking principal - mapea exactamente a la tabla bookings
///
/// La fecha del viaje se guarda como string calendario YYYY-MM-DD;
/// el motor de earnings la compara lexicográficamente contra "hoy".
/// El partner asignado se guarda siempre como UUID nativo.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub trip_code: String,
    pub pickup_location: String,
    pub drop_location: String,
    pub trip_date: String,
    pub trip_time: String,
    pub status: String,
    pub total_amount: Decimal,
    pub partner_payout_amount: Option<Decimal>,
    pub currency: String,
    pub payment_method: String,
    pub payment_status: String,
    pub vehicle_type_id: Option<Uuid>,
    pub assigned_partner_id: Option<Uuid>,
    pub assigned_partner_name: Option<String>,
    pub assigned_partner_email: Option<String>,
    pub available_for_partners: bool,
    pub partner_notification_sent: bool,
    pub eligible_partners_count: i32,
    pub partner_acceptance_deadline: Option<DateTime<Utc>>,
    pub assignment_email_sent: bool,
    pub created_at: DateTime<Utc>,
    /// Nullable: las filas importadas del sistema anterior no lo traen
    pub updated_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Importe que corresponde al partner: `partner_payout_amount` si existe,
    /// si no el importe total de la reserva
    pub fn resolved_payout_amount(&self) -> Decimal {
        self.partner_payout_amount.unwrap_or(self.total_amount)
    }

    /// Timestamp de finalización usado por la ventana "desde el último payout":
    /// `updated_at` si existe, si no `created_at`
    pub fn completion_timestamp(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }
}
