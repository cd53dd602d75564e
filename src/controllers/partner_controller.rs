//! Controlador del portal de partners: rides abiertos, aceptación y ledger

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::dto::booking_dto::{AvailableRideResponse, BookingResponse};
use crate::dto::common::ApiResponse;
use crate::dto::partner_dto::EarningsResponse;
use crate::repositories::{PartnerStore, PgBookingRepository, PgPartnerRepository};
use crate::services::assignment::AssignmentService;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppResult};

pub struct PartnerController {
    partners: Arc<PgPartnerRepository>,
    assignment: AssignmentService<PgBookingRepository, PgPartnerRepository>,
    state: AppState,
}

impl PartnerController {
    pub fn new(state: AppState) -> Self {
        let bookings = Arc::new(PgBookingRepository::new(state.pool.clone()));
        let partners = Arc::new(PgPartnerRepository::new(state.pool.clone()));
        let assignment = AssignmentService::new(
            bookings,
            partners.clone(),
            state.notifier.clone(),
            state.config.acceptance_window_minutes,
        );
        Self {
            partners,
            assignment,
            state,
        }
    }

    /// Rides abiertos que el partner puede aceptar
    pub async fn list_available_rides(
        &self,
        partner_id: Uuid,
    ) -> AppResult<Vec<AvailableRideResponse>> {
        let rides = self.assignment.list_available(partner_id, Utc::now()).await?;
        Ok(rides.into_iter().map(AvailableRideResponse::from).collect())
    }

    /// Aceptar un ride: exactamente un partner gana la carrera, los demás
    /// reciben Conflict y deben re-consultar los rides abiertos
    pub async fn accept_ride(
        &self,
        partner_id: Uuid,
        booking_id: Uuid,
    ) -> AppResult<ApiResponse<BookingResponse>> {
        let currency = self.state.currency();
        let booking = self
            .assignment
            .accept(booking_id, partner_id, &currency, Utc::now())
            .await?;

        Ok(ApiResponse::success_with_message(
            BookingResponse::from(booking),
            "Ride assigned".to_string(),
        ))
    }

    /// Vista del ledger financiero del partner
    pub async fn earnings(&self, partner_id: Uuid) -> AppResult<EarningsResponse> {
        let partner = self
            .partners
            .find_by_id(partner_id)
            .await?
            .ok_or_else(|| not_found_error("Partner", &partner_id.to_string()))?;

        Ok(EarningsResponse::from(partner))
    }
}
