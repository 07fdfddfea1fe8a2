// Roster API server
// Decision: Fall back to in-memory storage when DATABASE_URL is not set (dev mode)
// Decision: Graceful shutdown on Ctrl+C / SIGTERM

use anyhow::{Context, Result};
use roster_api::storage::StorageBackend;
use roster_api::{build_router, ServerConfig, Services};
use roster_core::telemetry::{init_tracing, TelemetryConfig};
use tokio::signal;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present; real environment variables take precedence
    let _ = dotenvy::dotenv();

    // Configure via environment variables:
    // - SERVICE_NAME: Service name (default: "roster-api")
    // - RUST_LOG / LOG_LEVEL: Log filter (default: "roster_api=debug,tower_http=debug")
    let mut telemetry_config = TelemetryConfig::from_env();
    if telemetry_config.service_name == "roster" {
        telemetry_config.service_name = "roster-api".to_string();
    }
    if telemetry_config.log_filter.is_none() {
        telemetry_config.log_filter = Some("roster_api=debug,tower_http=debug".to_string());
    }
    telemetry_config.service_version = Some(env!("CARGO_PKG_VERSION").to_string());
    init_tracing(telemetry_config);

    tracing::info!("roster-api starting...");

    let config = ServerConfig::from_env();

    let storage = match &config.database_url {
        Some(url) => StorageBackend::postgres(url)
            .await
            .context("Failed to connect to database")?,
        None => StorageBackend::in_memory(),
    };

    if storage.is_dev_mode() {
        tracing::warn!("DATABASE_URL not set, using in-memory storage (data lost on restart)");
    } else {
        tracing::info!("Connected to database");
    }

    let app = build_router(Services::new(storage), &config);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to address {}", config.bind_addr))?;
    tracing::info!("HTTP server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("roster-api stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Signal received, starting graceful shutdown");
}
