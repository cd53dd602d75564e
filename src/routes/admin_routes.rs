use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::payout_controller::PayoutController;
use crate::dto::common::ApiResponse;
use crate::dto::partner_dto::EarningsResponse;
use crate::services::earnings::EarningsLedger;
use crate::services::reconciliation::ReconcileAllSummary;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/partner/:partner_id/reconcile", post(reconcile_partner))
        .route("/partner/:partner_id/payout/clear", post(clear_payout))
        .route("/reconcile-all", post(reconcile_all))
}

async fn reconcile_partner(
    State(state): State<AppState>,
    Path(partner_id): Path<Uuid>,
) -> Result<Json<ApiResponse<EarningsLedger>>, AppError> {
    let controller = PayoutController::new(state);
    let response = controller.reconcile(partner_id).await?;
    Ok(Json(response))
}

async fn clear_payout(
    State(state): State<AppState>,
    Path(partner_id): Path<Uuid>,
) -> Result<Json<ApiResponse<EarningsResponse>>, AppError> {
    let controller = PayoutController::new(state);
    let response = controller.clear_payout(partner_id).await?;
    Ok(Json(response))
}

async fn reconcile_all(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ReconcileAllSummary>>, AppError> {
    let controller = PayoutController::new(state);
    let response = controller.reconcile_all().await?;
    Ok(Json(response))
}
