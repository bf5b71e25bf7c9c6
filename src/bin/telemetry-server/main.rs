mod args;

use std::{process::ExitCode, sync::Arc};

use anyhow::{Context as _, Result};
use args::Args;
use clap::Parser as _;
use home_telemetry::{
    api::{AppState, router},
    clock::SystemClock,
};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        error!("{e:#}");
        return ExitCode::from(1);
    }

    ExitCode::from(0)
}

async fn run() -> Result<()> {
    let config = Args::parse()
        .into_config()
        .context("failed to load configuration")?;

    info!(
        max_history = config.retention.max_history(),
        retain_count = config.retention.retain_count(),
        wait_time = config.wait_time.num_seconds(),
        auth_scope = ?config.credentials.scope(),
        status_policy = ?config.status_policy,
        timezone = config.timezone.name(),
        "loaded configuration"
    );

    let state = AppState::new(&config, Arc::new(SystemClock));
    let app = router(state);

    let address = config.server_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("listening on http://{address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shut down");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {e:#}");
        std::future::pending::<()>().await;
    }
}
