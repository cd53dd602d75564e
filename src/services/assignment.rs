//! Protocolo de asignación de rides
//!
//! Dos operaciones: el fan-out de elegibilidad cuando se crea una reserva,
//! y la aceptación por parte de un partner. La invariante de "como mucho
//! una asignación" la garantiza exclusivamente la actualización condicional
//! atómica de `BookingStore::try_assign`; aquí no hay locks.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::settings::CurrencySettings;
use crate::models::booking::Booking;
use crate::models::partner::Partner;
use crate::repositories::{BookingStore, FanoutOutcome, PartnerStore};
use crate::services::notification::NotificationDispatcher;
use crate::utils::errors::{forbidden_error, not_found_error, AppError, AppResult};

/// Resumen del fan-out, devuelto al llamador y persistido en la reserva
#[derive(Debug, Clone, Serialize)]
pub struct FanoutSummary {
    pub eligible_partners_count: i32,
    pub notification_sent: bool,
    pub available_for_partners: bool,
    pub acceptance_deadline: Option<DateTime<Utc>>,
}

pub struct AssignmentService<B: BookingStore, P: PartnerStore> {
    bookings: Arc<B>,
    partners: Arc<P>,
    notifier: Arc<dyn NotificationDispatcher>,
    acceptance_window_minutes: i64,
}

impl<B: BookingStore, P: PartnerStore> AssignmentService<B, P> {
    pub fn new(
        bookings: Arc<B>,
        partners: Arc<P>,
        notifier: Arc<dyn NotificationDispatcher>,
        acceptance_window_minutes: i64,
    ) -> Self {
        Self {
            bookings,
            partners,
            notifier,
            acceptance_window_minutes,
        }
    }

    /// Fan-out de elegibilidad: buscar partners aprobados y activos cuyo
    /// vehículo de flota coincide, avisarles, y abrir la reserva con un
    /// deadline de aceptación.
    ///
    /// Sin partners elegibles no hay error: la reserva queda marcada como
    /// no disponible con contador 0. Cada notificación es independiente,
    /// un fallo no bloquea a los demás partners.
    pub async fn fan_out(
        &self,
        booking: &Booking,
        currency: &CurrencySettings,
        now: DateTime<Utc>,
    ) -> AppResult<FanoutSummary> {
        let Some(vehicle_type_id) = booking.vehicle_type_id else {
            let outcome = FanoutOutcome {
                available_for_partners: false,
                notification_sent: false,
                eligible_partners_count: 0,
                acceptance_deadline: None,
            };
            self.bookings.record_fanout(booking.id, &outcome).await?;
            return Ok(summary_from(&outcome));
        };

        let eligible = self.partners.find_eligible_for_vehicle(vehicle_type_id).await?;

        if eligible.is_empty() {
            info!(
                "🚗 Reserva {} sin partners elegibles para el vehículo {}",
                booking.trip_code, vehicle_type_id
            );
            let outcome = FanoutOutcome {
                available_for_partners: false,
                notification_sent: false,
                eligible_partners_count: 0,
                acceptance_deadline: None,
            };
            self.bookings.record_fanout(booking.id, &outcome).await?;
            return Ok(summary_from(&outcome));
        }

        let amount = booking.resolved_payout_amount();
        let symbol = currency.symbol();

        let sends = eligible
            .iter()
            .map(|partner| self.notifier.notify_ride_available(partner, booking, amount, symbol));
        let results = join_all(sends).await;
        let notification_sent = results.iter().any(|ok| *ok);
        if !notification_sent {
            warn!(
                "📧 Ninguna notificación del ride {} llegó a los {} partners elegibles",
                booking.trip_code,
                eligible.len()
            );
        }

        let outcome = FanoutOutcome {
            available_for_partners: true,
            notification_sent,
            eligible_partners_count: eligible.len() as i32,
            acceptance_deadline: Some(now + Duration::minutes(self.acceptance_window_minutes)),
        };
        self.bookings.record_fanout(booking.id, &outcome).await?;

        info!(
            "🚗 Reserva {} abierta para {} partners hasta {:?}",
            booking.trip_code, outcome.eligible_partners_count, outcome.acceptance_deadline
        );

        Ok(summary_from(&outcome))
    }

    /// Aceptación de un ride por un partner: la carrera.
    ///
    /// Exactamente una de las peticiones concurrentes gana; las demás
    /// reciben Conflict, distinguible de NotFound. El correo de
    /// confirmación al ganador es best-effort y nunca revierte la
    /// asignación.
    pub async fn accept(
        &self,
        booking_id: Uuid,
        partner_id: Uuid,
        currency: &CurrencySettings,
        now: DateTime<Utc>,
    ) -> AppResult<Booking> {
        let partner = self
            .partners
            .find_by_id(partner_id)
            .await?
            .ok_or_else(|| not_found_error("Partner", &partner_id.to_string()))?;

        if !partner.is_eligible_for_rides() {
            return Err(forbidden_error(
                "accept ride",
                "partner is not approved or not active",
            ));
        }
        if partner.current_fleet_vehicle_id.is_none() {
            return Err(forbidden_error(
                "accept ride",
                "partner has no approved fleet vehicle",
            ));
        }

        match self.bookings.try_assign(booking_id, &partner, now).await? {
            Some(booking) => {
                info!(
                    "✅ Ride {} asignado al partner {} ({})",
                    booking.trip_code, partner.name, partner.id
                );
                let sent = self
                    .notifier
                    .notify_ride_assigned(&partner, &booking, booking.resolved_payout_amount(), currency.symbol())
                    .await;
                if sent {
                    if let Err(e) = self.bookings.mark_assignment_email_sent(booking.id).await {
                        warn!("📧 No se pudo marcar el correo de asignación como enviado: {}", e);
                    }
                } else {
                    warn!(
                        "📧 Falló el correo de confirmación del ride {} a {}",
                        booking.trip_code, partner.email
                    );
                }
                Ok(booking)
            }
            None => Err(self.explain_rejection(booking_id, &partner, now).await?),
        }
    }

    /// La actualización condicional no casó: averiguar por qué para
    /// devolver NotFound o un Conflict con causa concreta.
    async fn explain_rejection(
        &self,
        booking_id: Uuid,
        partner: &Partner,
        now: DateTime<Utc>,
    ) -> AppResult<AppError> {
        let Some(booking) = self.bookings.find_by_id(booking_id).await? else {
            return Ok(not_found_error("Booking", &booking_id.to_string()));
        };

        if booking.assigned_partner_id.is_some() {
            return Ok(AppError::Conflict(
                "Ride already assigned to another partner".to_string(),
            ));
        }
        if booking
            .partner_acceptance_deadline
            .map(|deadline| deadline <= now)
            .unwrap_or(true)
        {
            return Ok(AppError::Conflict(
                "Acceptance deadline has passed".to_string(),
            ));
        }
        let vehicle_matches = booking
            .vehicle_type_id
            .is_some_and(|vehicle| partner.operates_vehicle(vehicle));
        if !vehicle_matches {
            return Ok(AppError::Conflict(
                "Booking vehicle type does not match partner fleet".to_string(),
            ));
        }
        Ok(AppError::Conflict(
            "Ride is no longer available for partners".to_string(),
        ))
    }

    /// Rides abiertos que este partner puede aceptar (para re-consultar
    /// tras perder una carrera)
    pub async fn list_available(&self, partner_id: Uuid, now: DateTime<Utc>) -> AppResult<Vec<Booking>> {
        let partner = self
            .partners
            .find_by_id(partner_id)
            .await?
            .ok_or_else(|| not_found_error("Partner", &partner_id.to_string()))?;

        if !partner.is_eligible_for_rides() {
            return Err(forbidden_error(
                "list available rides",
                "partner is not approved or not active",
            ));
        }

        let Some(vehicle_type_id) = partner.current_fleet_vehicle_id else {
            return Ok(Vec::new());
        };

        self.bookings.list_available_for_vehicle(vehicle_type_id, now).await
    }
}

fn summary_from(outcome: &FanoutOutcome) -> FanoutSummary {
    FanoutSummary {
        eligible_partners_count: outcome.eligible_partners_count,
        notification_sent: outcome.notification_sent,
        available_for_partners: outcome.available_for_partners,
        acceptance_deadline: outcome.acceptance_deadline,
    }
}
