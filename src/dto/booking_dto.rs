//! DTOs de bookings

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::booking::Booking;
use crate::services::assignment::FanoutSummary;
use crate::utils::validation::{validate_booking_date, validate_booking_time};

// Request para crear una reserva (flujo público de booking)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequest {
    #[validate(length(min = 2, max = 500))]
    pub pickup_location: String,

    #[validate(length(min = 2, max = 500))]
    pub drop_location: String,

    #[validate(custom = "validate_date_field")]
    pub trip_date: String,

    #[validate(custom = "validate_time_field")]
    pub trip_time: String,

    pub total_amount: Decimal,

    pub partner_payout_amount: Option<Decimal>,

    /// "cash" u "online"
    #[validate(custom = "validate_payment_method_field")]
    pub payment_method: String,

    pub vehicle_type_id: Option<Uuid>,
}

fn validate_date_field(value: &str) -> Result<(), ValidationError> {
    validate_booking_date(value).map(|_| ())
}

fn validate_time_field(value: &str) -> Result<(), ValidationError> {
    validate_booking_time(value).map(|_| ())
}

fn validate_payment_method_field(value: &str) -> Result<(), ValidationError> {
    use crate::models::booking::payment_method;
    if value == payment_method::CASH || value == payment_method::ONLINE {
        Ok(())
    } else {
        let mut error = ValidationError::new("payment_method");
        error.add_param("value".into(), &value.to_string());
        Err(error)
    }
}

// Response de reserva
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub trip_code: String,
    pub pickup_location: String,
    pub drop_location: String,
    pub trip_date: String,
    pub trip_time: String,
    pub status: String,
    pub total_amount: Decimal,
    pub currency: String,
    pub payment_method: String,
    pub payment_status: String,
    pub available_for_partners: bool,
    pub eligible_partners_count: i32,
    pub partner_acceptance_deadline: Option<DateTime<Utc>>,
    pub assigned_partner_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            trip_code: b.trip_code,
            pickup_location: b.pickup_location,
            drop_location: b.drop_location,
            trip_date: b.trip_date,
            trip_time: b.trip_time,
            status: b.status,
            total_amount: b.total_amount,
            currency: b.currency,
            payment_method: b.payment_method,
            payment_status: b.payment_status,
            available_for_partners: b.available_for_partners,
            eligible_partners_count: b.eligible_partners_count,
            partner_acceptance_deadline: b.partner_acceptance_deadline,
            assigned_partner_name: b.assigned_partner_name,
            created_at: b.created_at,
        }
    }
}

// Response de creación: la reserva más el resultado del fan-out
#[derive(Debug, Serialize)]
pub struct BookingCreatedResponse {
    pub booking: BookingResponse,
    pub fanout: FanoutSummary,
}

// Vista de un ride abierto para el portal de partners: muestra el importe
// que cobraría el partner, no el total del cliente
#[derive(Debug, Serialize)]
pub struct AvailableRideResponse {
    pub booking_id: Uuid,
    pub trip_code: String,
    pub pickup_location: String,
    pub drop_location: String,
    pub trip_date: String,
    pub trip_time: String,
    pub payout_amount: Decimal,
    pub currency: String,
    pub acceptance_deadline: Option<DateTime<Utc>>,
}

impl From<Booking> for AvailableRideResponse {
    fn from(b: Booking) -> Self {
        let payout_amount = b.resolved_payout_amount();
        Self {
            booking_id: b.id,
            trip_code: b.trip_code,
            pickup_location: b.pickup_location,
            drop_location: b.drop_location,
            trip_date: b.trip_date,
            trip_time: b.trip_time,
            payout_amount,
            currency: b.currency,
            acceptance_deadline: b.partner_acceptance_deadline,
        }
    }
}
