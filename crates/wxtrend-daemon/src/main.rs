//! wxtrend daemon - scheduled observation ingest
//!
//! This binary coordinates:
//! - Observation fetches from the configured source
//! - Record writes to the configured store, one per interval

mod config;
mod scheduler;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wxtrend_core::ObservationSource;
use wxtrend_ingest::{Ingestor, NwsSource, SimulatorSource};

use crate::config::{DaemonConfig, SourceKind};
use crate::scheduler::Scheduler;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting wxtrend daemon");

    // Load configuration
    let config = DaemonConfig::from_env()?;
    info!("Loaded configuration: {:?}", config);

    // Open the record store
    let store = wxtrend_db::open_store(&config.store_url)
        .await
        .context("Failed to open record store")?;
    info!("Record store ready");

    let source: Arc<dyn ObservationSource> = match config.source {
        SourceKind::Nws => Arc::new(
            NwsSource::new(
                &config.nws_base_url,
                &config.station_id,
                &config.nws_user_agent,
            )
            .context("Failed to build NWS source")?,
        ),
        SourceKind::Simulator => Arc::new(SimulatorSource::default()),
    };
    info!("Observation source: {}", source.name());

    let ingestor = Ingestor::new(source, config.location.clone());
    let mut scheduler = Scheduler::new(
        ingestor,
        store,
        Duration::from_secs(config.ingest_interval),
    );

    info!("Daemon running - press Ctrl+C to stop");

    // Run until shutdown signal
    tokio::select! {
        result = scheduler.run() => {
            if let Err(e) = result {
                error!("Scheduler error: {}", e);
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }
    scheduler.stop();

    let (succeeded, failed) = scheduler.counts();
    info!(
        "wxtrend daemon stopped ({} ingests ok, {} failed)",
        succeeded, failed
    );
    Ok(())
}
