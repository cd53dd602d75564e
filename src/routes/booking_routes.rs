use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::booking_controller::BookingController;
use crate::dto::booking_dto::{BookingCreatedResponse, BookingResponse, CreateBookingRequest};
use crate::dto::common::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_booking_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_booking))
        .route("/:trip_code", get(get_booking))
}

async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<Json<ApiResponse<BookingCreatedResponse>>, AppError> {
    let controller = BookingController::new(state);
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn get_booking(
    State(state): State<AppState>,
    Path(trip_code): Path<String>,
) -> Result<Json<BookingResponse>, AppError> {
    let controller = BookingController::new(state);
    let response = controller.get_by_trip_code(&trip_code).await?;
    Ok(Json(response))
}
