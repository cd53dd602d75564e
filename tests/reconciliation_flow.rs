//! Tests de la orquestación de reconciliación
//!
//! El motor puro tiene su propia batería en `services::earnings`; aquí se
//! prueba el ciclo completo contra stores en memoria: persistencia
//! idempotente, la ventana tras un clear-payout y la escritura versionada.

mod support;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use ride_booking::models::partner::Partner;
use ride_booking::repositories::{BookingStore, PartnerStore};
use ride_booking::services::earnings::EarningsLedger;
use ride_booking::services::reconciliation::ReconciliationService;
use ride_booking::utils::errors::{AppError, AppResult};

use support::{make_open_booking, make_partner, InMemoryBookingStore, InMemoryPartnerStore};

fn assigned_booking(partner_id: Uuid, payout: &str, updated_at: DateTime<Utc>) -> ride_booking::models::booking::Booking {
    let mut booking = make_open_booking(Some(Uuid::new_v4()), 30);
    booking.assigned_partner_id = Some(partner_id);
    booking.available_for_partners = false;
    booking.partner_payout_amount = Some(payout.parse().unwrap());
    booking.updated_at = Some(updated_at);
    booking
}

#[tokio::test]
async fn reconcile_persists_ledger_and_is_idempotent() {
    let partner = make_partner("Ledger Fleet", Some(Uuid::new_v4()));
    let partner_id = partner.id;

    let bookings = Arc::new(InMemoryBookingStore::with_bookings(vec![
        assigned_booking(partner_id, "95", Utc::now()),
        assigned_booking(partner_id, "55", Utc::now()),
    ]));
    let partners = Arc::new(InMemoryPartnerStore::with_partners(vec![partner]));
    let svc = ReconciliationService::new(bookings, partners.clone());

    let first = svc.reconcile_partner(partner_id).await.unwrap();
    assert_eq!(first.total_earnings, "150".parse::<Decimal>().unwrap());
    assert_eq!(first.online_earnings, "150".parse::<Decimal>().unwrap());
    assert_eq!(first.payout_balance, "150".parse::<Decimal>().unwrap());
    assert_eq!(first.cash_earnings, Decimal::ZERO);

    // Segunda pasada sin bookings nuevos: mismos números
    let second = svc.reconcile_partner(partner_id).await.unwrap();
    assert_eq!(first, second);

    let stored = partners.get(partner_id).unwrap();
    assert_eq!(stored.payout_balance, "150".parse::<Decimal>().unwrap());
    assert_eq!(stored.ledger_version, 2, "cada pasada avanza la versión");
}

#[tokio::test]
async fn clear_payout_resets_balance_and_windows_next_reconcile() {
    let partner = make_partner("Window Fleet", Some(Uuid::new_v4()));
    let partner_id = partner.id;
    let now = Utc::now();

    let bookings = Arc::new(InMemoryBookingStore::with_bookings(vec![assigned_booking(
        partner_id,
        "95",
        now - Duration::hours(1),
    )]));
    let partners = Arc::new(InMemoryPartnerStore::with_partners(vec![partner]));
    let svc = ReconciliationService::new(bookings.clone(), partners.clone());

    svc.reconcile_partner(partner_id).await.unwrap();

    let cleared = svc.clear_payout(partner_id).await.unwrap();
    assert_eq!(cleared.payout_balance, Decimal::ZERO);
    assert!(cleared.last_payout_at.is_some());
    // El clear no toca los totales de por vida
    assert_eq!(cleared.total_earnings, "95".parse::<Decimal>().unwrap());

    // Llega un booking completado después del desembolso
    bookings
        .create(&assigned_booking(partner_id, "40", now + Duration::hours(1)))
        .await
        .unwrap();

    let ledger = svc.reconcile_partner(partner_id).await.unwrap();
    assert_eq!(ledger.total_earnings, "135".parse::<Decimal>().unwrap());
    assert_eq!(ledger.online_earnings, "135".parse::<Decimal>().unwrap());
    // Solo el booking posterior al clear cuenta para el balance pendiente
    assert_eq!(ledger.payout_balance, "40".parse::<Decimal>().unwrap());
}

#[tokio::test]
async fn reconcile_missing_partner_is_not_found() {
    let svc = ReconciliationService::new(
        Arc::new(InMemoryBookingStore::default()),
        Arc::new(InMemoryPartnerStore::default()),
    );

    let result = svc.reconcile_partner(Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn reconcile_all_counts_partners_and_continues_past_failures() {
    let vehicle = Some(Uuid::new_v4());
    let a = make_partner("Fleet A", vehicle);
    let b = make_partner("Fleet B", vehicle);
    let a_id = a.id;

    let bookings = Arc::new(InMemoryBookingStore::with_bookings(vec![assigned_booking(
        a_id,
        "95",
        Utc::now(),
    )]));
    let partners = Arc::new(InMemoryPartnerStore::with_partners(vec![a, b]));
    let svc = ReconciliationService::new(bookings, partners.clone());

    let summary = svc.reconcile_all().await.unwrap();
    assert_eq!(summary.partners_processed, 2);
    assert_eq!(summary.partners_failed, 0);

    let stored = partners.get(a_id).unwrap();
    assert_eq!(stored.total_earnings, "95".parse::<Decimal>().unwrap());
}

/// Store que siempre pierde la escritura versionada, como si un
/// clear-payout concurrente avanzara la versión en cada intento
struct AlwaysStalePartnerStore {
    inner: InMemoryPartnerStore,
}

#[async_trait]
impl PartnerStore for AlwaysStalePartnerStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Partner>> {
        self.inner.find_by_id(id).await
    }

    async fn find_eligible_for_vehicle(&self, vehicle_type_id: Uuid) -> AppResult<Vec<Partner>> {
        self.inner.find_eligible_for_vehicle(vehicle_type_id).await
    }

    async fn list_approved(&self) -> AppResult<Vec<Partner>> {
        self.inner.list_approved().await
    }

    async fn update_ledger(
        &self,
        _partner_id: Uuid,
        _expected_version: i64,
        _ledger: &EarningsLedger,
    ) -> AppResult<bool> {
        Ok(false)
    }

    async fn clear_payout(&self, partner_id: Uuid, now: DateTime<Utc>) -> AppResult<Partner> {
        self.inner.clear_payout(partner_id, now).await
    }
}

#[tokio::test]
async fn reconcile_gives_up_with_conflict_after_bounded_retries() {
    let partner = make_partner("Contended Fleet", Some(Uuid::new_v4()));
    let partner_id = partner.id;

    let svc = ReconciliationService::new(
        Arc::new(InMemoryBookingStore::default()),
        Arc::new(AlwaysStalePartnerStore {
            inner: InMemoryPartnerStore::with_partners(vec![partner]),
        }),
    );

    let result = svc.reconcile_partner(partner_id).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}
