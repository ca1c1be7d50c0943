use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use wxtrend_ingest::{Ingestor, NwsSource};
use wxtrend_summary::{Aggregator, ScanStrategy};

#[tokio::main]
async fn main() -> Result<()> {
    // Observability
    wxtrend_obs::init("wxtrend-api");

    // Config
    let cfg = wxtrend_config::AppConfig::load().context("Failed to load configuration")?;

    let store = wxtrend_db::open_store(&cfg.store_url())
        .await
        .context("Failed to open record store")?;

    let source = NwsSource::new(&cfg.base_url(), &cfg.station_id(), &cfg.user_agent())
        .context("Failed to build observation source")?;
    tracing::info!(url = %source.observations_url(), "Observation source configured");
    let ingestor = Ingestor::new(Arc::new(source), cfg.location());

    let strategy = if cfg.single_pass_scan() {
        ScanStrategy::SinglePass
    } else {
        ScanStrategy::TwoPass
    };
    let aggregator = Aggregator::new(strategy);

    let (app, state) = wxtrend_api::build_app(store, ingestor, aggregator, cfg.window_hours())?;

    // Start HTTP server
    let addr: SocketAddr = cfg
        .http_bind()
        .parse()
        .context("Invalid HTTP bind address")?;
    let listener = TcpListener::bind(addr)
        .await
        .context("failed to bind TCP listener")?;

    // Mark ready just before serving
    wxtrend_api::set_ready(&state, true);

    tracing::info!(%addr, "HTTP server listening");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
