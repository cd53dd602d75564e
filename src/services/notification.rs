//! Despacho de notificaciones a partners
//!
//! Las notificaciones son best-effort: el que llama trata el retorno
//! booleano como informativo y nunca aborta la operación principal por
//! un fallo de envío.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::json;
use tracing::{debug, warn};

use crate::models::booking::Booking;
use crate::models::partner::Partner;

/// Contrato del despachador de notificaciones
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Avisar a un partner de que hay un ride disponible para su flota
    async fn notify_ride_available(
        &self,
        partner: &Partner,
        booking: &Booking,
        amount: Decimal,
        currency_symbol: &str,
    ) -> bool;

    /// Confirmar al partner ganador que el ride es suyo
    async fn notify_ride_assigned(
        &self,
        partner: &Partner,
        booking: &Booking,
        amount: Decimal,
        currency_symbol: &str,
    ) -> bool;
}

/// Implementación sobre el servicio HTTP de correo
pub struct EmailNotifier {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl EmailNotifier {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
        }
    }

    async fn send(&self, to: &str, subject: &str, body: serde_json::Value) -> bool {
        let payload = json!({
            "to": to,
            "subject": subject,
            "template_data": body,
        });

        let result = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                warn!("📧 El servicio de correo respondió {} para {}", response.status(), to);
                false
            }
            Err(e) => {
                warn!("📧 Error enviando correo a {}: {}", to, e);
                false
            }
        }
    }
}

#[async_trait]
impl NotificationDispatcher for EmailNotifier {
    async fn notify_ride_available(
        &self,
        partner: &Partner,
        booking: &Booking,
        amount: Decimal,
        currency_symbol: &str,
    ) -> bool {
        self.send(
            &partner.email,
            "New ride available for your fleet",
            json!({
                "partner_name": partner.name,
                "trip_code": booking.trip_code,
                "pickup": booking.pickup_location,
                "drop": booking.drop_location,
                "date": booking.trip_date,
                "time": booking.trip_time,
                "payout": format!("{}{}", currency_symbol, amount),
            }),
        )
        .await
    }

    async fn notify_ride_assigned(
        &self,
        partner: &Partner,
        booking: &Booking,
        amount: Decimal,
        currency_symbol: &str,
    ) -> bool {
        self.send(
            &partner.email,
            "Ride assigned to you",
            json!({
                "partner_name": partner.name,
                "trip_code": booking.trip_code,
                "pickup": booking.pickup_location,
                "drop": booking.drop_location,
                "date": booking.trip_date,
                "time": booking.trip_time,
                "payout": format!("{}{}", currency_symbol, amount),
            }),
        )
        .await
    }
}

/// Despachador nulo para entornos sin servicio de correo configurado
pub struct NoopNotifier;

#[async_trait]
impl NotificationDispatcher for NoopNotifier {
    async fn notify_ride_available(
        &self,
        partner: &Partner,
        booking: &Booking,
        _amount: Decimal,
        _currency_symbol: &str,
    ) -> bool {
        debug!(
            "📧 Correo deshabilitado: ride {} disponible para {}",
            booking.trip_code, partner.email
        );
        true
    }

    async fn notify_ride_assigned(
        &self,
        partner: &Partner,
        booking: &Booking,
        _amount: Decimal,
        _currency_symbol: &str,
    ) -> bool {
        debug!(
            "📧 Correo deshabilitado: ride {} asignado a {}",
            booking.trip_code, partner.email
        );
        true
    }
}
