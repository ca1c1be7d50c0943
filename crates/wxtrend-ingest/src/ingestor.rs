//! Single-shot ingest: fetch one observation, write one record

use std::sync::Arc;

use tracing::{info, instrument, warn};
use wxtrend_core::{
    Confirmation, LatestObservation, ObservationRecord, ObservationSource, RecordStore,
    Timestamp, CELSIUS,
};

use crate::{IngestError, IngestResult};

/// Location label used when none is configured
pub const DEFAULT_LOCATION: &str = "Plymouth, MN";

/// Writes the latest observation of one fixed station to a record store
pub struct Ingestor {
    source: Arc<dyn ObservationSource>,
    location: String,
}

impl Ingestor {
    pub fn new(source: Arc<dyn ObservationSource>, location: impl Into<String>) -> Self {
        Self {
            source,
            location: location.into(),
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Fetch, stamp with the current time, and append one record
    pub async fn ingest(&self, store: &dyn RecordStore) -> IngestResult<Confirmation> {
        self.ingest_at(store, chrono::Utc::now().timestamp()).await
    }

    /// Same as [`Ingestor::ingest`] with an explicit timestamp
    #[instrument(skip(self, store), fields(source = %self.source.name()))]
    pub async fn ingest_at(
        &self,
        store: &dyn RecordStore,
        now: Timestamp,
    ) -> IngestResult<Confirmation> {
        let observation = self.source.latest().await.map_err(|e| {
            warn!(error = %e, "Observation fetch failed");
            IngestError::from(e)
        })?;

        let record = self.build_record(&observation, now)?;

        store.append(&record).await.map_err(|e| {
            warn!(error = %e, "Observation write failed");
            IngestError::StoreWrite(e)
        })?;

        info!(
            "Recorded {} {} for {} at {}",
            record.temperature, record.unit, record.location, record.timestamp
        );
        Ok(Confirmation::from(&record))
    }

    /// Normalize an upstream observation into a storable record.
    ///
    /// Upstream reports "no data" as null; optional fields are stored as 0.
    pub fn build_record(
        &self,
        observation: &LatestObservation,
        now: Timestamp,
    ) -> IngestResult<ObservationRecord> {
        let temperature = observation
            .temperature
            .ok_or(IngestError::MissingTemperature)?;
        let or_zero = |v: Option<f64>| Some(v.unwrap_or(0.0));

        Ok(ObservationRecord {
            timestamp: now,
            location: self.location.clone(),
            temperature,
            unit: CELSIUS.to_string(),
            dewpoint: or_zero(observation.dewpoint),
            windspeed: or_zero(observation.wind_speed),
            precipitation_last_6_hrs: or_zero(observation.precipitation_last_6_hours),
            windchill: or_zero(observation.wind_chill),
            heatindex: or_zero(observation.heat_index),
        })
    }
}
