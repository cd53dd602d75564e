//! Repositorios de acceso a datos
//!
//! Este módulo define los traits de acceso a bookings y partners y sus
//! implementaciones PostgreSQL. Los servicios dependen de los traits, lo
//! que permite probar el protocolo de asignación sin base de datos.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::booking::Booking;
use crate::models::partner::Partner;
use crate::services::earnings::EarningsLedger;
use crate::utils::errors::AppResult;

pub mod booking_repository;
pub mod partner_repository;

pub use booking_repository::PgBookingRepository;
pub use partner_repository::PgPartnerRepository;

/// Datos del fan-out que se persisten sobre la reserva
#[derive(Debug, Clone)]
pub struct FanoutOutcome {
    pub available_for_partners: bool,
    pub notification_sent: bool,
    pub eligible_partners_count: i32,
    pub acceptance_deadline: Option<DateTime<Utc>>,
}

/// Acceso a reservas
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn create(&self, booking: &Booking) -> AppResult<Booking>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>>;

    async fn find_by_trip_code(&self, trip_code: &str) -> AppResult<Option<Booking>>;

    /// Reservas asignadas a un partner (entrada del motor de earnings)
    async fn find_assigned_to_partner(&self, partner_id: Uuid) -> AppResult<Vec<Booking>>;

    /// Reservas abiertas que un partner con este vehículo puede aceptar
    async fn list_available_for_vehicle(
        &self,
        vehicle_type_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Booking>>;

    /// Registrar el resultado del fan-out de elegibilidad
    async fn record_fanout(&self, booking_id: Uuid, outcome: &FanoutOutcome) -> AppResult<()>;

    /// Intento de asignación: una sola actualización condicional atómica.
    ///
    /// El filtro comprueba a la vez id, vehículo, disponibilidad, status
    /// "upcoming", ausencia de partner asignado y deadline vigente.
    /// Devuelve la reserva ya asignada, o None si la condición no casó
    /// (otro partner ganó, el deadline venció o la reserva se retiró).
    async fn try_assign(
        &self,
        booking_id: Uuid,
        partner: &Partner,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Booking>>;

    /// Marcar que el correo de confirmación de asignación ya se envió
    async fn mark_assignment_email_sent(&self, booking_id: Uuid) -> AppResult<()>;
}

/// Acceso a partners y a su ledger financiero
#[async_trait]
pub trait PartnerStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Partner>>;

    /// Partners aprobados y activos cuyo vehículo de flota (actual o de
    /// una solicitud aprobada legacy) coincide con el solicitado
    async fn find_eligible_for_vehicle(&self, vehicle_type_id: Uuid) -> AppResult<Vec<Partner>>;

    /// Todos los partners aprobados (backfill de reconciliación)
    async fn list_approved(&self) -> AppResult<Vec<Partner>>;

    /// Escritura versionada del ledger. Devuelve false si la versión
    /// esperada ya no coincide (un clear-payout concurrente la avanzó).
    async fn update_ledger(
        &self,
        partner_id: Uuid,
        expected_version: i64,
        ledger: &EarningsLedger,
    ) -> AppResult<bool>;

    /// Desembolso: pone el balance a cero, sella `last_payout_at` y avanza
    /// la versión del ledger. No toca los otros tres acumuladores.
    async fn clear_payout(&self, partner_id: Uuid, now: DateTime<Utc>) -> AppResult<Partner>;
}
