//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but request-level
//! errors should use `kernel::error::AppError`.

mod app;
mod config;
mod health;
mod middleware;

use admission::{InMemoryRateLimitStore, spawn_sweeper};
use anyhow::Context;
use platform::clock::{Clock, SystemClock};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::{AppDependencies, build_router};
use crate::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,admission=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(ApiConfig::from_env()?);

    // Database is optional; it only backs the readiness probe
    let database = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .acquire_timeout(Duration::from_secs(3))
                .connect_lazy(url)
                .context("DATABASE_URL is not a valid connection string")?;
            tracing::info!("Database readiness probe enabled");
            Some(pool)
        }
        None => {
            tracing::info!("DATABASE_URL not set, readiness reports the server only");
            None
        }
    };

    let store = Arc::new(InMemoryRateLimitStore::new());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let sweeper = spawn_sweeper(
        store.clone(),
        clock.clone(),
        config.admission.sweep_interval,
    );

    tracing::info!(
        max_requests = config.admission.max_requests,
        window_ms = config.admission.window_ms(),
        sweep_interval_ms = config.admission.sweep_interval.as_millis() as u64,
        client_ip_source = ?config.admission.client_ip_source,
        "Rate limiting enabled"
    );

    let app = build_router(AppDependencies {
        config: config.clone(),
        store,
        clock,
        database,
    });

    // Start server
    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(environment = %config.environment, "Listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    sweeper.stop();
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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

    tracing::info!("Shutdown signal received");
}
