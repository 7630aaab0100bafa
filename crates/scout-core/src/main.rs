mod artifacts;
mod config;
mod http;
mod state;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::info;

use config::ServeConfig;
use state::ServerState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = ServeConfig::load()?;
    let artifacts = artifacts::load(&config)?;
    let state = Arc::new(ServerState::from_artifacts(artifacts));

    info!(
        model_id = %state.model_id(),
        model_version = %state.model_version(),
        policy = ?config.unseen_policy,
        columns = state.pipeline().schema().len(),
        "scout-serve started"
    );

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!(%addr, "listening");

    axum::serve(listener, http::router(state))
        .with_graceful_shutdown(async {
            let _ = signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;

    info!("scout-serve stopped");
    Ok(())
}
