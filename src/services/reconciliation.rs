//! Orquestación de la reconciliación de earnings
//!
//! Adaptador fino alrededor del motor puro de `earnings`: trae las filas,
//! computa en memoria y escribe el ledger una sola vez. La ruta de admin,
//! el backfill y el job programado pasan todos por aquí.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::partner::Partner;
use crate::repositories::{BookingStore, PartnerStore};
use crate::services::earnings::{compute_partner_earnings, today_string, EarningsLedger};
use crate::utils::errors::{not_found_error, AppError, AppResult};

/// Reintentos de la escritura versionada antes de rendirse
const MAX_LEDGER_WRITE_ATTEMPTS: u32 = 3;

/// Resultado del backfill sobre todos los partners aprobados
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileAllSummary {
    pub partners_processed: u32,
    pub partners_failed: u32,
}

pub struct ReconciliationService<B: BookingStore, P: PartnerStore> {
    bookings: Arc<B>,
    partners: Arc<P>,
}

impl<B: BookingStore, P: PartnerStore> ReconciliationService<B, P> {
    pub fn new(bookings: Arc<B>, partners: Arc<P>) -> Self {
        Self { bookings, partners }
    }

    /// Recomputar y persistir el ledger de un partner.
    ///
    /// La escritura va condicionada a `ledger_version`: si un clear-payout
    /// concurrente avanzó la versión, esta pasada quedó obsoleta y se
    /// recomputa contra el estado fresco. Idempotente: sin bookings nuevos,
    /// dos pasadas producen los mismos cuatro números.
    pub async fn reconcile_partner(&self, partner_id: Uuid) -> AppResult<EarningsLedger> {
        for attempt in 1..=MAX_LEDGER_WRITE_ATTEMPTS {
            let partner = self
                .partners
                .find_by_id(partner_id)
                .await?
                .ok_or_else(|| not_found_error("Partner", &partner_id.to_string()))?;

            let bookings = self.bookings.find_assigned_to_partner(partner_id).await?;
            let today = today_string(Utc::now());
            let ledger =
                compute_partner_earnings(partner_id, &bookings, &today, partner.last_payout_at);

            if self
                .partners
                .update_ledger(partner_id, partner.ledger_version, &ledger)
                .await?
            {
                info!(
                    "💰 Ledger del partner {} reconciliado: total={} online={} cash={} payout={}",
                    partner_id,
                    ledger.total_earnings,
                    ledger.online_earnings,
                    ledger.cash_earnings,
                    ledger.payout_balance
                );
                return Ok(ledger);
            }

            warn!(
                "💰 Versión del ledger del partner {} cambió durante la pasada (intento {}/{})",
                partner_id, attempt, MAX_LEDGER_WRITE_ATTEMPTS
            );
        }

        Err(AppError::Conflict(format!(
            "Partner {} ledger kept changing concurrently, giving up",
            partner_id
        )))
    }

    /// Desembolso de fondos: balance a cero y sello de `last_payout_at`.
    /// Los totales de por vida no se tocan.
    pub async fn clear_payout(&self, partner_id: Uuid) -> AppResult<Partner> {
        let partner = self.partners.clear_payout(partner_id, Utc::now()).await?;
        info!("💸 Payout del partner {} liquidado", partner_id);
        Ok(partner)
    }

    /// Backfill: reconciliar todos los partners aprobados. Un fallo
    /// individual se registra y no detiene al resto.
    pub async fn reconcile_all(&self) -> AppResult<ReconcileAllSummary> {
        let partners = self.partners.list_approved().await?;
        let mut summary = ReconcileAllSummary {
            partners_processed: 0,
            partners_failed: 0,
        };

        for partner in partners {
            match self.reconcile_partner(partner.id).await {
                Ok(_) => summary.partners_processed += 1,
                Err(e) => {
                    error!("💰 Reconciliación del partner {} falló: {}", partner.id, e);
                    summary.partners_failed += 1;
                }
            }
        }

        info!(
            "💰 Backfill de reconciliación: {} ok, {} fallos",
            summary.partners_processed, summary.partners_failed
        );
        Ok(summary)
    }
}

/// Job programado: reconciliar periódicamente todos los partners.
/// Es una de las tres vías de invocación; las tres pasan por el mismo
/// motor.
pub fn spawn_reconciliation_job<B, P>(
    service: Arc<ReconciliationService<B, P>>,
    interval_secs: u64,
) -> tokio::task::JoinHandle<()>
where
    B: BookingStore + 'static,
    P: PartnerStore + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(interval_secs));
        // El primer tick es inmediato; saltarlo para no competir con el arranque
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = service.reconcile_all().await {
                error!("💰 Pasada programada de reconciliación falló: {}", e);
            }
        }
    })
}
