use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::partner_controller::PartnerController;
use crate::dto::booking_dto::{AvailableRideResponse, BookingResponse};
use crate::dto::common::ApiResponse;
use crate::dto::partner_dto::EarningsResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

// TODO: sustituir el partner_id de la ruta por el del token de sesión
// cuando el middleware de auth del portal esté integrado
pub fn create_partner_router() -> Router<AppState> {
    Router::new()
        .route("/:partner_id/rides/available", get(list_available_rides))
        .route("/:partner_id/rides/:booking_id/accept", post(accept_ride))
        .route("/:partner_id/earnings", get(get_earnings))
}

async fn list_available_rides(
    State(state): State<AppState>,
    Path(partner_id): Path<Uuid>,
) -> Result<Json<Vec<AvailableRideResponse>>, AppError> {
    let controller = PartnerController::new(state);
    let response = controller.list_available_rides(partner_id).await?;
    Ok(Json(response))
}

async fn accept_ride(
    State(state): State<AppState>,
    Path((partner_id, booking_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let controller = PartnerController::new(state);
    let response = controller.accept_ride(partner_id, booking_id).await?;
    Ok(Json(response))
}

async fn get_earnings(
    State(state): State<AppState>,
    Path(partner_id): Path<Uuid>,
) -> Result<Json<EarningsResponse>, AppError> {
    let controller = PartnerController::new(state);
    let response = controller.earnings(partner_id).await?;
    Ok(Json(response))
}
