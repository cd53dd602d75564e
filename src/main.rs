use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use ride_booking::config::environment::EnvironmentConfig;
use ride_booking::database;
use ride_booking::middleware::cors::{cors_middleware, cors_middleware_with_origins};
use ride_booking::repositories::{PgBookingRepository, PgPartnerRepository};
use ride_booking::routes;
use ride_booking::services::reconciliation::{spawn_reconciliation_job, ReconciliationService};
use ride_booking::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚕 Ride Booking - Partner & Payout API");
    info!("======================================");

    // Inicializar base de datos
    let pool = match database::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let config = EnvironmentConfig::default();
    let app_state = AppState::new(pool.clone(), config.clone());

    // Job programado de reconciliación (misma computación que la ruta
    // de admin y el backfill)
    let reconciliation = Arc::new(ReconciliationService::new(
        Arc::new(PgBookingRepository::new(pool.clone())),
        Arc::new(PgPartnerRepository::new(pool)),
    ));
    let _reconcile_job = spawn_reconciliation_job(reconciliation, config.reconcile_interval_secs);

    let cors = if config.cors_origins.is_empty() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(config.cors_origins.clone())
    };

    // Crear router de la API
    let app = Router::new()
        .route("/health", get(health_endpoint))
        .nest("/api/booking", routes::booking_routes::create_booking_router())
        .nest("/api/partner", routes::partner_routes::create_partner_router())
        .nest("/api/admin", routes::admin_routes::create_admin_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("📋 Endpoints - Booking:");
    info!("   POST /api/booking - Crear reserva (dispara el fan-out a partners)");
    info!("   GET  /api/booking/:trip_code - Consultar reserva");
    info!("🚗 Endpoints - Partner:");
    info!("   GET  /api/partner/:id/rides/available - Rides abiertos para su flota");
    info!("   POST /api/partner/:id/rides/:booking_id/accept - Aceptar ride");
    info!("   GET  /api/partner/:id/earnings - Ledger del partner");
    info!("🛠️  Endpoints - Admin:");
    info!("   POST /api/admin/partner/:id/reconcile - Reconciliar earnings");
    info!("   POST /api/admin/partner/:id/payout/clear - Liquidar payout");
    info!("   POST /api/admin/reconcile-all - Backfill de todos los partners");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "service": "ride-booking",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
