use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use jobseeker_api::app::{app, AppState};
use jobseeker_api::config::config;
use jobseeker_api::database::{DatabaseManager, JobseekerRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config();
    tracing::info!("Starting Jobseeker API in {:?} mode", config.environment);
    if jobseeker_api::is_production!() && config.security.jwt_secret.is_none() {
        anyhow::bail!("JWT_SECRET must be set in production");
    }

    let state = AppState::new(Arc::new(JobseekerRepository::shared()));
    let shutdown = state.shutdown.clone();

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Jobseeker API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutdown requested; cancelling in-flight exports");
            shutdown.cancel();
        })
        .await
        .context("server error")?;

    DatabaseManager::close().await;
    Ok(())
}
