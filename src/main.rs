//! Burger House REST service.

use burger_core::JwtValidator;
use burger_db::{Database, connect};
use burger_house::config::Config;
use burger_house::{AppState, build_app};
use burger_telemetry::{TelemetryConfig, init_metrics, setup_telemetry};
use tokio::signal;
use tracing::{error, info, warn};

/// Build version (injected at compile time or default)
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match Config::init() {
        Ok(config) => config,
        Err(e) => {
            // Default subscriber so the failure is still logged.
            if setup_telemetry(&TelemetryConfig::default()).is_ok() {
                error!(error = %e, "Invalid configuration");
            }
            return Err(e);
        }
    };
    setup_telemetry(&config.telemetry())?;

    let addr = config.listen_addr();
    info!(
        version = VERSION,
        address = %addr,
        db = %config.mongo_db_name,
        pid = std::process::id(),
        "Starting burger-house"
    );

    let jwt = JwtValidator::new(&config.jwt_secret).map_err(|e| {
        error!(error = %e, "Could not initialize the token validator");
        anyhow::anyhow!("token validator unavailable: {e}")
    })?;

    let store = connect(&config.store()).await.map_err(|e| {
        error!(error = %e, "Could not connect to the document store");
        anyhow::anyhow!("document store unavailable: {e}")
    })?;
    let database = Database::mongo(store);

    let mut state = AppState::new(database.clone(), jwt);
    if let Some(seed) = config.admin_seed() {
        state.users.bootstrap_admin(seed).await.map_err(|e| {
            error!(error = %e, "Could not provision the administrator");
            anyhow::anyhow!("administrator provisioning failed: {e}")
        })?;
    }

    match init_metrics() {
        Ok(handle) => state = state.with_metrics(handle),
        Err(e) => warn!(error = %e, "Prometheus exporter not installed"),
    }

    let app = build_app(state, config.cors_origins.as_deref());

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        error!(error = %e, address = %addr, "Failed to bind");
        e
    })?;
    info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    database.close().await;
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
