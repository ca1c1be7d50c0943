//! Observation ingest for wxtrend
//!
//! An [`Ingestor`] pulls the latest observation for one fixed station from
//! an [`ObservationSource`](wxtrend_core::ObservationSource) and appends it
//! to a record store. Sources live here too: the api.weather.gov client and
//! a simulator for local runs.

pub mod ingestor;
pub mod nws;
pub mod simulator;

pub use ingestor::*;
pub use nws::*;
pub use simulator::*;

use thiserror::Error;
use wxtrend_core::{SourceError, StoreError};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] SourceError),

    #[error("Store write error: {0}")]
    StoreWrite(#[source] StoreError),

    #[error("Observation has no temperature")]
    MissingTemperature,
}

impl IngestError {
    /// Upstream HTTP status for fetch failures
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            IngestError::Fetch(e) => e.status(),
            _ => None,
        }
    }
}

pub type IngestResult<T> = Result<T, IngestError>;
