//! Controlador de admin: reconciliación de earnings y desembolsos
//!
//! Adaptadores finos sobre `ReconciliationService`; la ruta de admin, el
//! backfill y el job programado comparten el mismo motor.

use std::sync::Arc;

use uuid::Uuid;

use crate::dto::common::ApiResponse;
use crate::dto::partner_dto::EarningsResponse;
use crate::repositories::{PgBookingRepository, PgPartnerRepository};
use crate::services::earnings::EarningsLedger;
use crate::services::reconciliation::{ReconcileAllSummary, ReconciliationService};
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub struct PayoutController {
    reconciliation: ReconciliationService<PgBookingRepository, PgPartnerRepository>,
}

impl PayoutController {
    pub fn new(state: AppState) -> Self {
        let bookings = Arc::new(PgBookingRepository::new(state.pool.clone()));
        let partners = Arc::new(PgPartnerRepository::new(state.pool.clone()));
        Self {
            reconciliation: ReconciliationService::new(bookings, partners),
        }
    }

    /// Recomputar el ledger de un partner y persistirlo
    pub async fn reconcile(&self, partner_id: Uuid) -> AppResult<ApiResponse<EarningsLedger>> {
        let ledger = self.reconciliation.reconcile_partner(partner_id).await?;
        Ok(ApiResponse::success_with_message(
            ledger,
            "Partner earnings reconciled".to_string(),
        ))
    }

    /// Desembolso de fondos: balance a cero y sello de last_payout_at
    pub async fn clear_payout(&self, partner_id: Uuid) -> AppResult<ApiResponse<EarningsResponse>> {
        let partner = self.reconciliation.clear_payout(partner_id).await?;
        Ok(ApiResponse::success_with_message(
            EarningsResponse::from(partner),
            "Payout cleared".to_string(),
        ))
    }

    /// Backfill: reconciliar todos los partners aprobados
    pub async fn reconcile_all(&self) -> AppResult<ApiResponse<ReconcileAllSummary>> {
        let summary = self.reconciliation.reconcile_all().await?;
        Ok(ApiResponse::success(summary))
    }
}
