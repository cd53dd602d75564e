//! Motor de reconciliación de earnings
//!
//! Este módulo contiene la computación pura del ledger de un partner a
//! partir de sus bookings asignados. Es la única copia de esta lógica:
//! la ruta de admin, el job programado y el backfill llaman todos aquí.
//!
//! Reglas:
//! - Una reserva cuenta como completada si su status es "completed", o si
//!   no está cancelada y su fecha (YYYY-MM-DD) ya pasó. Esto cubre el
//!   flujo operativo donde nadie marca las reservas como completadas.
//! - El pago está confirmado si es cash o si el pago online se completó.
//! - Cash suma a total y cash earnings; online suma a total, online y
//!   payout balance. Cash nunca entra al payout balance.
//! - Si el partner ya cobró alguna vez (`last_payout_at`), el payout
//!   balance se recalcula solo con bookings completados estrictamente
//!   después de ese momento. Los totales de por vida no se tocan.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use uuid::Uuid;

use crate::models::booking::{booking_status, payment_method, payment_status, Booking};

/// Resultado de la reconciliación: los cuatro acumuladores del ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EarningsLedger {
    pub total_earnings: Decimal,
    pub online_earnings: Decimal,
    pub cash_earnings: Decimal,
    pub payout_balance: Decimal,
}

impl EarningsLedger {
    pub fn zero() -> Self {
        Self {
            total_earnings: Decimal::ZERO,
            online_earnings: Decimal::ZERO,
            cash_earnings: Decimal::ZERO,
            payout_balance: Decimal::ZERO,
        }
    }

    /// Redondear los cuatro acumuladores a 2 decimales (mitad hacia arriba
    /// sobre el céntimo)
    fn rounded(self) -> Self {
        let round = |d: Decimal| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Self {
            total_earnings: round(self.total_earnings),
            online_earnings: round(self.online_earnings),
            cash_earnings: round(self.cash_earnings),
            payout_balance: round(self.payout_balance),
        }
    }
}

/// Fecha "hoy" en formato YYYY-MM-DD para el predicado de completado
pub fn today_string(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

/// Predicado de completado para earnings: status explícito, o fecha
/// vencida sin cancelación. La comparación de fechas es de strings, el
/// formato YYYY-MM-DD ordena lexicográficamente igual que cronológicamente.
pub fn is_completed_for_earnings(booking: &Booking, today: &str) -> bool {
    if booking.status == booking_status::COMPLETED {
        return true;
    }
    booking.status != booking_status::CANCELED && booking.trip_date.as_str() < today
}

/// El pago de una reserva está confirmado si es en efectivo o si el
/// pago online se completó
pub fn is_payment_confirmed(booking: &Booking) -> bool {
    booking.payment_method == payment_method::CASH
        || booking.payment_status == payment_status::COMPLETED
}

/// Computar el ledger de un partner a partir de sus bookings
///
/// Función pura: no toca la base de datos. `bookings` puede traer filas de
/// otros partners o no completadas; se filtran aquí, así todos los
/// llamadores aplican exactamente el mismo criterio.
pub fn compute_partner_earnings(
    partner_id: Uuid,
    bookings: &[Booking],
    today: &str,
    last_payout_at: Option<DateTime<Utc>>,
) -> EarningsLedger {
    let eligible: Vec<&Booking> = bookings
        .iter()
        .filter(|b| b.assigned_partner_id == Some(partner_id))
        .filter(|b| is_completed_for_earnings(b, today))
        .collect();

    let mut ledger = EarningsLedger::zero();

    for booking in &eligible {
        let amount = booking.resolved_payout_amount();
        if amount <= Decimal::ZERO {
            continue;
        }
        if !is_payment_confirmed(booking) {
            continue;
        }
        ledger.total_earnings += amount;
        if booking.payment_method == payment_method::CASH {
            ledger.cash_earnings += amount;
        } else {
            ledger.online_earnings += amount;
            ledger.payout_balance += amount;
        }
    }

    // Segunda pasada: si ya hubo un payout, el balance pendiente solo
    // cubre lo completado estrictamente después. Los totales de por vida
    // quedan como están.
    if let Some(cutoff) = last_payout_at {
        ledger.payout_balance = Decimal::ZERO;
        for booking in &eligible {
            let amount = booking.resolved_payout_amount();
            if amount <= Decimal::ZERO {
                continue;
            }
            if booking.completion_timestamp() <= cutoff {
                continue;
            }
            if is_payment_confirmed(booking) && booking.payment_method != payment_method::CASH {
                ledger.payout_balance += amount;
            }
        }
    }

    ledger.rounded()
}
