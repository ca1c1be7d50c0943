//! Core data types for stored observations and computed summaries

use serde::{Deserialize, Serialize};

/// Timestamp type (Unix epoch seconds)
pub type Timestamp = i64;

/// Temperature unit tag written with every record
pub const CELSIUS: &str = "C";

/// One stored observation (the unit of storage)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObservationRecord {
    /// Wall-clock time the record was ingested (Unix epoch seconds)
    pub timestamp: Timestamp,

    /// Human readable station location
    pub location: String,

    pub temperature: f64,

    /// Unit tag for `temperature`, e.g. "C"
    pub unit: String,

    #[serde(default)]
    pub dewpoint: Option<f64>,

    #[serde(default)]
    pub windspeed: Option<f64>,

    #[serde(default)]
    pub precipitation_last_6_hrs: Option<f64>,

    #[serde(default)]
    pub windchill: Option<f64>,

    #[serde(default)]
    pub heatindex: Option<f64>,
}

impl ObservationRecord {
    /// Record with only the required fields set
    pub fn new(
        timestamp: Timestamp,
        location: impl Into<String>,
        temperature: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            location: location.into(),
            temperature,
            unit: unit.into(),
            dewpoint: None,
            windspeed: None,
            precipitation_last_6_hrs: None,
            windchill: None,
            heatindex: None,
        }
    }

    /// Fill every optional field with its default (0) before aggregation
    pub fn normalize(&self) -> Reading {
        Reading {
            timestamp: self.timestamp,
            temperature: self.temperature,
            dewpoint: self.dewpoint.unwrap_or_default(),
            windspeed: self.windspeed.unwrap_or_default(),
            precipitation_last_6_hrs: self.precipitation_last_6_hrs.unwrap_or_default(),
            windchill: self.windchill.unwrap_or_default(),
            heatindex: self.heatindex.unwrap_or_default(),
        }
    }
}

/// Fully populated view of a record, as consumed by the rollups
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub timestamp: Timestamp,
    pub temperature: f64,
    pub dewpoint: f64,
    pub windspeed: f64,
    pub precipitation_last_6_hrs: f64,
    pub windchill: f64,
    pub heatindex: f64,
}

/// Latest observation as reported by the upstream source.
///
/// Values are already converted to canonical units (degrees C, km/h, mm).
/// Each field is independently nullable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatestObservation {
    pub temperature: Option<f64>,
    pub dewpoint: Option<f64>,
    pub wind_speed: Option<f64>,
    pub precipitation_last_6_hours: Option<f64>,
    pub wind_chill: Option<f64>,
    pub heat_index: Option<f64>,
}

/// Returned by a successful ingest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confirmation {
    pub timestamp: Timestamp,
    pub location: String,
    pub temperature: f64,
    pub unit: String,
}

impl From<&ObservationRecord> for Confirmation {
    fn from(record: &ObservationRecord) -> Self {
        Self {
            timestamp: record.timestamp,
            location: record.location.clone(),
            temperature: record.temperature,
            unit: record.unit.clone(),
        }
    }
}

/// Current conditions plus trailing-window trend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub min_temperature: f64,
    pub max_temperature: f64,
    /// Windowed mean, rounded to one decimal place unless that would leave
    /// [min, max]; then it is the nearer bound at full precision
    pub average_temperature: f64,
    pub current_temperature: f64,
    /// `None` only when the full scan came back empty
    pub all_time_min_temperature: Option<f64>,
    pub all_time_max_temperature: Option<f64>,
    pub current_dewpoint: f64,
    pub current_heatindex: f64,
    pub current_windchill: f64,
    pub current_windspeed: f64,
    pub precipitation_6_hr: f64,
}

/// Result of one summarize pass
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryOutcome {
    Summary(Summary),
    /// Nothing was recorded inside the window
    NoData,
}

impl SummaryOutcome {
    pub fn summary(&self) -> Option<&Summary> {
        match self {
            SummaryOutcome::Summary(summary) => Some(summary),
            SummaryOutcome::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, SummaryOutcome::NoData)
    }
}
