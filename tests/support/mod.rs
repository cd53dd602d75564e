//! Stores en memoria para probar los servicios sin PostgreSQL
//!
//! `try_assign` reproduce el contrato del repositorio real: todas las
//! condiciones se comprueban y la mutación se aplica bajo el mismo lock,
//! así dos intentos concurrentes nunca ven ambos el estado previo.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use ride_booking::models::booking::{booking_status, payment_method, payment_status, Booking};
use ride_booking::models::partner::{fleet_request_status, partner_status, FleetRequest, Partner};
use ride_booking::repositories::{BookingStore, FanoutOutcome, PartnerStore};
use ride_booking::services::earnings::EarningsLedger;
use ride_booking::services::notification::NotificationDispatcher;
use ride_booking::utils::errors::{not_found_error, AppResult};

#[derive(Default)]
pub struct InMemoryBookingStore {
    bookings: Mutex<HashMap<Uuid, Booking>>,
}

impl InMemoryBookingStore {
    pub fn with_bookings(bookings: Vec<Booking>) -> Self {
        Self {
            bookings: Mutex::new(bookings.into_iter().map(|b| (b.id, b)).collect()),
        }
    }

    pub fn insert(&self, booking: Booking) {
        self.bookings.lock().unwrap().insert(booking.id, booking);
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn create(&self, booking: &Booking) -> AppResult<Booking> {
        self.insert(booking.clone());
        Ok(booking.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        Ok(self.bookings.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_trip_code(&self, trip_code: &str) -> AppResult<Option<Booking>> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .values()
            .find(|b| b.trip_code == trip_code)
            .cloned())
    }

    async fn find_assigned_to_partner(&self, partner_id: Uuid) -> AppResult<Vec<Booking>> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.assigned_partner_id == Some(partner_id))
            .cloned()
            .collect())
    }

    async fn list_available_for_vehicle(
        &self,
        vehicle_type_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Booking>> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .values()
            .filter(|b| {
                b.vehicle_type_id == Some(vehicle_type_id)
                    && b.available_for_partners
                    && b.status == booking_status::UPCOMING
                    && b.assigned_partner_id.is_none()
                    && b.partner_acceptance_deadline.map(|d| d > now).unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    async fn record_fanout(&self, booking_id: Uuid, outcome: &FanoutOutcome) -> AppResult<()> {
        let mut bookings = self.bookings.lock().unwrap();
        let booking = bookings
            .get_mut(&booking_id)
            .ok_or_else(|| not_found_error("Booking", &booking_id.to_string()))?;
        booking.available_for_partners = outcome.available_for_partners;
        booking.partner_notification_sent = outcome.notification_sent;
        booking.eligible_partners_count = outcome.eligible_partners_count;
        booking.partner_acceptance_deadline = outcome.acceptance_deadline;
        booking.updated_at = Some(Utc::now());
        Ok(())
    }

    async fn try_assign(
        &self,
        booking_id: Uuid,
        partner: &Partner,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Booking>> {
        let mut bookings = self.bookings.lock().unwrap();
        let Some(booking) = bookings.get_mut(&booking_id) else {
            return Ok(None);
        };

        let matches = partner.current_fleet_vehicle_id.is_some()
            && booking.vehicle_type_id == partner.current_fleet_vehicle_id
            && booking.available_for_partners
            && booking.status == booking_status::UPCOMING
            && booking.assigned_partner_id.is_none()
            && booking.partner_acceptance_deadline.map(|d| d > now).unwrap_or(false);

        if !matches {
            return Ok(None);
        }

        booking.assigned_partner_id = Some(partner.id);
        booking.assigned_partner_name = Some(partner.name.clone());
        booking.assigned_partner_email = Some(partner.email.clone());
        booking.available_for_partners = false;
        booking.assignment_email_sent = false;
        booking.updated_at = Some(now);
        Ok(Some(booking.clone()))
    }

    async fn mark_assignment_email_sent(&self, booking_id: Uuid) -> AppResult<()> {
        let mut bookings = self.bookings.lock().unwrap();
        if let Some(booking) = bookings.get_mut(&booking_id) {
            booking.assignment_email_sent = true;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryPartnerStore {
    partners: Mutex<HashMap<Uuid, Partner>>,
    fleet_requests: Mutex<Vec<FleetRequest>>,
}

impl InMemoryPartnerStore {
    pub fn with_partners(partners: Vec<Partner>) -> Self {
        Self {
            partners: Mutex::new(partners.into_iter().map(|p| (p.id, p)).collect()),
            fleet_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn get(&self, id: Uuid) -> Option<Partner> {
        self.partners.lock().unwrap().get(&id).cloned()
    }

    pub fn add_fleet_request(&self, partner_id: Uuid, vehicle_type_id: Uuid, status: &str) {
        self.fleet_requests.lock().unwrap().push(FleetRequest {
            id: Uuid::new_v4(),
            partner_id,
            vehicle_type_id,
            status: status.to_string(),
            created_at: Utc::now(),
        });
    }

    fn has_approved_fleet_request(&self, partner_id: Uuid, vehicle_type_id: Uuid) -> bool {
        self.fleet_requests.lock().unwrap().iter().any(|fr| {
            fr.partner_id == partner_id
                && fr.vehicle_type_id == vehicle_type_id
                && fr.status == fleet_request_status::APPROVED
        })
    }
}

#[async_trait]
impl PartnerStore for InMemoryPartnerStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Partner>> {
        Ok(self.get(id))
    }

    async fn find_eligible_for_vehicle(&self, vehicle_type_id: Uuid) -> AppResult<Vec<Partner>> {
        // Mismo contrato dual que el repositorio Pg: flota actual o
        // solicitud de flota aprobada legacy
        Ok(self
            .partners
            .lock()
            .unwrap()
            .values()
            .filter(|p| {
                p.status == partner_status::APPROVED
                    && p.is_active
                    && (p.current_fleet_vehicle_id == Some(vehicle_type_id)
                        || self.has_approved_fleet_request(p.id, vehicle_type_id))
            })
            .cloned()
            .collect())
    }

    async fn list_approved(&self) -> AppResult<Vec<Partner>> {
        Ok(self
            .partners
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.status == partner_status::APPROVED)
            .cloned()
            .collect())
    }

    async fn update_ledger(
        &self,
        partner_id: Uuid,
        expected_version: i64,
        ledger: &EarningsLedger,
    ) -> AppResult<bool> {
        let mut partners = self.partners.lock().unwrap();
        let Some(partner) = partners.get_mut(&partner_id) else {
            return Ok(false);
        };
        if partner.ledger_version != expected_version {
            return Ok(false);
        }
        partner.total_earnings = ledger.total_earnings;
        partner.online_earnings = ledger.online_earnings;
        partner.cash_earnings = ledger.cash_earnings;
        partner.payout_balance = ledger.payout_balance;
        partner.ledger_version += 1;
        partner.updated_at = Some(Utc::now());
        Ok(true)
    }

    async fn clear_payout(&self, partner_id: Uuid, now: DateTime<Utc>) -> AppResult<Partner> {
        let mut partners = self.partners.lock().unwrap();
        let partner = partners
            .get_mut(&partner_id)
            .ok_or_else(|| not_found_error("Partner", &partner_id.to_string()))?;
        partner.payout_balance = Decimal::ZERO;
        partner.last_payout_at = Some(now);
        partner.ledger_version += 1;
        partner.updated_at = Some(now);
        Ok(partner.clone())
    }
}

/// Notificador de prueba: registra los envíos y puede fallar para
/// partners concretos
#[derive(Default)]
pub struct RecordingNotifier {
    pub fail_for: HashSet<Uuid>,
    pub available_notified: Mutex<Vec<Uuid>>,
    pub assigned_notified: Mutex<Vec<Uuid>>,
}

#[async_trait]
impl NotificationDispatcher for RecordingNotifier {
    async fn notify_ride_available(
        &self,
        partner: &Partner,
        _booking: &Booking,
        _amount: Decimal,
        _currency_symbol: &str,
    ) -> bool {
        self.available_notified.lock().unwrap().push(partner.id);
        !self.fail_for.contains(&partner.id)
    }

    async fn notify_ride_assigned(
        &self,
        partner: &Partner,
        _booking: &Booking,
        _amount: Decimal,
        _currency_symbol: &str,
    ) -> bool {
        self.assigned_notified.lock().unwrap().push(partner.id);
        !self.fail_for.contains(&partner.id)
    }
}

pub fn make_partner(name: &str, vehicle: Option<Uuid>) -> Partner {
    Partner {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        status: partner_status::APPROVED.to_string(),
        is_active: true,
        current_fleet_vehicle_id: vehicle,
        total_earnings: Decimal::ZERO,
        online_earnings: Decimal::ZERO,
        cash_earnings: Decimal::ZERO,
        payout_balance: Decimal::ZERO,
        last_payout_at: None,
        ledger_version: 0,
        created_at: Utc::now(),
        updated_at: None,
    }
}

pub fn make_open_booking(vehicle: Option<Uuid>, deadline_in_minutes: i64) -> Booking {
    let now = Utc::now();
    Booking {
        id: Uuid::new_v4(),
        trip_code: format!("TRP-{}", &Uuid::new_v4().simple().to_string()[..6].to_uppercase()),
        pickup_location: "Central station".to_string(),
        drop_location: "Airport".to_string(),
        trip_date: "2000-01-02".to_string(),
        trip_time: "09:30".to_string(),
        status: booking_status::UPCOMING.to_string(),
        total_amount: "120".parse().unwrap(),
        partner_payout_amount: Some("95".parse().unwrap()),
        currency: "EUR".to_string(),
        payment_method: payment_method::ONLINE.to_string(),
        payment_status: payment_status::COMPLETED.to_string(),
        vehicle_type_id: vehicle,
        assigned_partner_id: None,
        assigned_partner_name: None,
        assigned_partner_email: None,
        available_for_partners: true,
        partner_notification_sent: true,
        eligible_partners_count: 1,
        partner_acceptance_deadline: Some(now + Duration::minutes(deadline_in_minutes)),
        assignment_email_sent: false,
        created_at: now,
        updated_at: Some(now),
    }
}
