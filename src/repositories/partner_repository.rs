//! Repositorio PostgreSQL de partners

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::partner::{fleet_request_status, partner_status, Partner};
use crate::repositories::PartnerStore;
use crate::services::earnings::EarningsLedger;
use crate::utils::errors::{not_found_error, AppResult};

pub struct PgPartnerRepository {
    pool: PgPool,
}

impl PgPartnerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PartnerStore for PgPartnerRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Partner>> {
        let partner = sqlx::query_as::<_, Partner>("SELECT * FROM partners WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(partner)
    }

    async fn find_eligible_for_vehicle(&self, vehicle_type_id: Uuid) -> AppResult<Vec<Partner>> {
        // Flota actual, o solicitud de flota aprobada para partners
        // anteriores a la columna current_fleet_vehicle_id
        let partners = sqlx::query_as::<_, Partner>(
            r#"
            SELECT p.* FROM partners p
            WHERE p.status = $1
              AND p.is_active = TRUE
              AND (
                    p.current_fleet_vehicle_id = $2
                    OR EXISTS (
                        SELECT 1 FROM fleet_requests fr
                        WHERE fr.partner_id = p.id
                          AND fr.vehicle_type_id = $2
                          AND fr.status = $3
                    )
              )
            "#,
        )
        .bind(partner_status::APPROVED)
        .bind(vehicle_type_id)
        .bind(fleet_request_status::APPROVED)
        .fetch_all(&self.pool)
        .await?;

        Ok(partners)
    }

    async fn list_approved(&self) -> AppResult<Vec<Partner>> {
        let partners =
            sqlx::query_as::<_, Partner>("SELECT * FROM partners WHERE status = $1 ORDER BY created_at")
                .bind(partner_status::APPROVED)
                .fetch_all(&self.pool)
                .await?;

        Ok(partners)
    }

    async fn update_ledger(
        &self,
        partner_id: Uuid,
        expected_version: i64,
        ledger: &EarningsLedger,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE partners
            SET total_earnings = $3,
                online_earnings = $4,
                cash_earnings = $5,
                payout_balance = $6,
                ledger_version = ledger_version + 1,
                updated_at = $7
            WHERE id = $1 AND ledger_version = $2
            "#,
        )
        .bind(partner_id)
        .bind(expected_version)
        .bind(ledger.total_earnings)
        .bind(ledger.online_earnings)
        .bind(ledger.cash_earnings)
        .bind(ledger.payout_balance)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn clear_payout(&self, partner_id: Uuid, now: DateTime<Utc>) -> AppResult<Partner> {
        let partner = sqlx::query_as::<_, Partner>(
            r#"
            UPDATE partners
            SET payout_balance = 0,
                last_payout_at = $2,
                ledger_version = ledger_version + 1,
                updated_at = $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(partner_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        partner.ok_or_else(|| not_found_error("Partner", &partner_id.to_string()))
    }
}
