//! Repositorio PostgreSQL de bookings

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::booking::{booking_status, Booking};
use crate::models::partner::Partner;
use crate::repositories::{BookingStore, FanoutOutcome};
use crate::utils::errors::AppResult;

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for PgBookingRepository {
    async fn create(&self, booking: &Booking) -> AppResult<Booking> {
        let created = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (
                id, trip_code, pickup_location, drop_location, trip_date, trip_time,
                status, total_amount, partner_payout_amount, currency,
                payment_method, payment_status, vehicle_type_id,
                available_for_partners, partner_notification_sent,
                eligible_partners_count, assignment_email_sent, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17, $18)
            RETURNING *
            "#,
        )
        .bind(booking.id)
        .bind(&booking.trip_code)
        .bind(&booking.pickup_location)
        .bind(&booking.drop_location)
        .bind(&booking.trip_date)
        .bind(&booking.trip_time)
        .bind(&booking.status)
        .bind(booking.total_amount)
        .bind(booking.partner_payout_amount)
        .bind(&booking.currency)
        .bind(&booking.payment_method)
        .bind(&booking.payment_status)
        .bind(booking.vehicle_type_id)
        .bind(booking.available_for_partners)
        .bind(booking.partner_notification_sent)
        .bind(booking.eligible_partners_count)
        .bind(booking.assignment_email_sent)
        .bind(booking.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    async fn find_by_trip_code(&self, trip_code: &str) -> AppResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE trip_code = $1")
            .bind(trip_code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    async fn find_assigned_to_partner(&self, partner_id: Uuid) -> AppResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE assigned_partner_id = $1 ORDER BY created_at",
        )
        .bind(partner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    async fn list_available_for_vehicle(
        &self,
        vehicle_type_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT * FROM bookings
            WHERE vehicle_type_id = $1
              AND available_for_partners = TRUE
              AND status = $2
              AND assigned_partner_id IS NULL
              AND partner_acceptance_deadline > $3
            ORDER BY created_at DESC
            "#,
        )
        .bind(vehicle_type_id)
        .bind(booking_status::UPCOMING)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    async fn record_fanout(&self, booking_id: Uuid, outcome: &FanoutOutcome) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE bookings
            SET available_for_partners = $2,
                partner_notification_sent = $3,
                eligible_partners_count = $4,
                partner_acceptance_deadline = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(booking_id)
        .bind(outcome.available_for_partners)
        .bind(outcome.notification_sent)
        .bind(outcome.eligible_partners_count)
        .bind(outcome.acceptance_deadline)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn try_assign(
        &self,
        booking_id: Uuid,
        partner: &Partner,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Booking>> {
        // Actualización condicional de una sola fila: el WHERE comprueba las
        // cinco condiciones a la vez y Postgres garantiza que dos updates
        // concurrentes no ven ambos la fila pre-actualización.
        let assigned = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET assigned_partner_id = $2,
                assigned_partner_name = $3,
                assigned_partner_email = $4,
                available_for_partners = FALSE,
                assignment_email_sent = FALSE,
                updated_at = $6
            WHERE id = $1
              AND vehicle_type_id = $5
              AND available_for_partners = TRUE
              AND status = $7
              AND assigned_partner_id IS NULL
              AND partner_acceptance_deadline > $6
            RETURNING *
            "#,
        )
        .bind(booking_id)
        .bind(partner.id)
        .bind(&partner.name)
        .bind(&partner.email)
        .bind(partner.current_fleet_vehicle_id)
        .bind(now)
        .bind(booking_status::UPCOMING)
        .fetch_optional(&self.pool)
        .await?;

        Ok(assigned)
    }

    async fn mark_assignment_email_sent(&self, booking_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE bookings SET assignment_email_sent = TRUE, updated_at = $2 WHERE id = $1")
            .bind(booking_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
