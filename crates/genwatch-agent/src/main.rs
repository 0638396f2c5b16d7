//! Genwatch agent binary.

use anyhow::{Context, Result};
use genwatch_agent::{AgentConfig, Integration};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting genwatch agent");

    let config = AgentConfig::from_env()?;
    let integration = Integration::setup(&config)
        .await
        .with_context(|| format!("Generator at {} is not ready", config.device.host))?;

    integration
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
        })
        .await
}
