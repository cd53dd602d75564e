//! Controlador de bookings: creación desde el flujo público y consulta

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::dto::booking_dto::{BookingCreatedResponse, BookingResponse, CreateBookingRequest};
use crate::dto::common::ApiResponse;
use crate::models::booking::{booking_status, payment_status, Booking};
use crate::repositories::{BookingStore, PgBookingRepository, PgPartnerRepository};
use crate::services::assignment::{AssignmentService, FanoutSummary};
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::generate_trip_code;

pub struct BookingController {
    bookings: Arc<PgBookingRepository>,
    assignment: AssignmentService<PgBookingRepository, PgPartnerRepository>,
    state: AppState,
}

impl BookingController {
    pub fn new(state: AppState) -> Self {
        let bookings = Arc::new(PgBookingRepository::new(state.pool.clone()));
        let partners = Arc::new(PgPartnerRepository::new(state.pool.clone()));
        let assignment = AssignmentService::new(
            bookings.clone(),
            partners,
            state.notifier.clone(),
            state.config.acceptance_window_minutes,
        );
        Self {
            bookings,
            assignment,
            state,
        }
    }

    /// Crear una reserva y disparar el fan-out de elegibilidad si trae
    /// tipo de vehículo
    pub async fn create(
        &self,
        request: CreateBookingRequest,
    ) -> AppResult<ApiResponse<BookingCreatedResponse>> {
        request.validate()?;

        if request.total_amount <= Decimal::ZERO {
            return Err(AppError::BadRequest(
                "total_amount must be greater than zero".to_string(),
            ));
        }

        let now = Utc::now();
        let currency = self.state.currency();

        let booking = Booking {
            id: Uuid::new_v4(),
            trip_code: generate_trip_code(),
            pickup_location: request.pickup_location,
            drop_location: request.drop_location,
            trip_date: request.trip_date,
            trip_time: request.trip_time,
            status: booking_status::UPCOMING.to_string(),
            total_amount: request.total_amount,
            partner_payout_amount: request.partner_payout_amount,
            currency: currency.code.clone(),
            payment_method: request.payment_method,
            payment_status: payment_status::PENDING.to_string(),
            vehicle_type_id: request.vehicle_type_id,
            assigned_partner_id: None,
            assigned_partner_name: None,
            assigned_partner_email: None,
            available_for_partners: false,
            partner_notification_sent: false,
            eligible_partners_count: 0,
            partner_acceptance_deadline: None,
            assignment_email_sent: false,
            created_at: now,
            updated_at: None,
        };

        let created = self.bookings.create(&booking).await?;

        let fanout: FanoutSummary = self.assignment.fan_out(&created, &currency, now).await?;

        // Releer la fila para devolver las flags que el fan-out persistió
        let booking = self
            .bookings
            .find_by_id(created.id)
            .await?
            .unwrap_or(created);

        Ok(ApiResponse::success_with_message(
            BookingCreatedResponse {
                booking: BookingResponse::from(booking),
                fanout,
            },
            "Booking created".to_string(),
        ))
    }

    pub async fn get_by_trip_code(&self, trip_code: &str) -> AppResult<BookingResponse> {
        let booking = self
            .bookings
            .find_by_trip_code(trip_code)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Booking with trip code '{}' not found", trip_code))
            })?;

        Ok(BookingResponse::from(booking))
    }
}
