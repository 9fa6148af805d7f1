use anyhow::{Context, Result};
use dotenvy::dotenv;
use shared::telemetry::{self, TelemetryConfig};
use tracing::{error, info};

use zoom_recordings_connector::config::ZoomConnectorConfig;
use zoom_recordings_connector::sync::SyncManager;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let telemetry_config = TelemetryConfig::from_env("zoom-recordings-connector");
    telemetry::init_telemetry(telemetry_config)?;

    info!("Starting Zoom recordings download");

    let config = ZoomConnectorConfig::load().context("Failed to load configuration")?;

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| format!("Failed to create {}", config.output_dir.display()))?;

    info!("Saving recordings to {}", config.output_dir.display());

    let sync_manager = SyncManager::new(&config);

    if let Err(e) = sync_manager.run().await {
        error!("Run aborted: {}", e);
        return Err(e.into());
    }

    Ok(())
}
