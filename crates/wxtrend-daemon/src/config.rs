//! Daemon configuration from environment variables

use anyhow::{bail, Context, Result};
use std::env;
use wxtrend_ingest::{DEFAULT_BASE_URL, DEFAULT_LOCATION, DEFAULT_STATION, DEFAULT_USER_AGENT};

/// Which observation source feeds the ingestor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Nws,
    Simulator,
}

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// Record store URL (mysql://, sqlite://, memory:)
    pub store_url: String,

    /// Seconds between ingests (default: 600)
    pub ingest_interval: u64,

    pub station_id: String,

    pub location: String,

    pub source: SourceKind,

    pub nws_base_url: String,

    pub nws_user_agent: String,
}

impl DaemonConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_url = lookup("STORE_URL").context("STORE_URL environment variable not set")?;

        let ingest_interval: u64 = lookup("INGEST_INTERVAL")
            .unwrap_or_else(|| "600".to_string())
            .parse()
            .context("Invalid INGEST_INTERVAL")?;
        if ingest_interval == 0 {
            bail!("INGEST_INTERVAL must be at least 1 second");
        }

        let source = match lookup("STATION_DRIVER").as_deref().unwrap_or("nws") {
            "nws" => SourceKind::Nws,
            "simulator" => SourceKind::Simulator,
            other => bail!("Unknown STATION_DRIVER: {}", other),
        };

        Ok(Self {
            store_url,
            ingest_interval,
            station_id: lookup("STATION_ID").unwrap_or_else(|| DEFAULT_STATION.to_string()),
            location: lookup("STATION_LOCATION").unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            source,
            nws_base_url: lookup("NWS_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            nws_user_agent: lookup("NWS_USER_AGENT")
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        })
    }
}
