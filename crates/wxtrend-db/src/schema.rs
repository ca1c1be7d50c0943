//! Storage schema for observation records
//!
//! One row per ingested observation. There is no primary key on
//! `timestamp`: two ingests in the same second produce two rows.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use wxtrend_core::{ObservationRecord, Timestamp};

/// Observation table row
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ObservationRow {
    /// Ingest time (Unix epoch seconds)
    pub timestamp: i64,

    pub location: String,
    pub temperature: f64,
    pub unit: String,

    pub dewpoint: Option<f64>,
    pub windspeed: Option<f64>,
    pub precipitation_last_6_hrs: Option<f64>,
    pub windchill: Option<f64>,
    pub heatindex: Option<f64>,
}

impl From<ObservationRow> for ObservationRecord {
    fn from(row: ObservationRow) -> Self {
        ObservationRecord {
            timestamp: row.timestamp as Timestamp,
            location: row.location,
            temperature: row.temperature,
            unit: row.unit,
            dewpoint: row.dewpoint,
            windspeed: row.windspeed,
            precipitation_last_6_hrs: row.precipitation_last_6_hrs,
            windchill: row.windchill,
            heatindex: row.heatindex,
        }
    }
}

impl From<&ObservationRecord> for ObservationRow {
    fn from(record: &ObservationRecord) -> Self {
        ObservationRow {
            timestamp: record.timestamp,
            location: record.location.clone(),
            temperature: record.temperature,
            unit: record.unit.clone(),
            dewpoint: record.dewpoint,
            windspeed: record.windspeed,
            precipitation_last_6_hrs: record.precipitation_last_6_hrs,
            windchill: record.windchill,
            heatindex: record.heatindex,
        }
    }
}

/// Table names
pub mod tables {
    pub const OBSERVATIONS: &str = "temperature_data";
}

/// Column list shared by every SELECT and INSERT
pub const COLUMNS: &str = "`timestamp`, location, temperature, unit, \
    dewpoint, windspeed, precipitation_last_6_hrs, windchill, heatindex";

pub const MYSQL_CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS temperature_data (
    id BIGINT AUTO_INCREMENT PRIMARY KEY,
    `timestamp` BIGINT NOT NULL,
    location VARCHAR(128) NOT NULL,
    temperature DOUBLE NOT NULL,
    unit VARCHAR(8) NOT NULL,
    dewpoint DOUBLE NULL,
    windspeed DOUBLE NULL,
    precipitation_last_6_hrs DOUBLE NULL,
    windchill DOUBLE NULL,
    heatindex DOUBLE NULL,
    INDEX idx_timestamp (`timestamp`)
)
"#;

pub const SQLITE_CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS temperature_data (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    `timestamp` INTEGER NOT NULL,
    location TEXT NOT NULL,
    temperature REAL NOT NULL,
    unit TEXT NOT NULL,
    dewpoint REAL,
    windspeed REAL,
    precipitation_last_6_hrs REAL,
    windchill REAL,
    heatindex REAL
);
CREATE INDEX IF NOT EXISTS idx_timestamp ON temperature_data (`timestamp`);
"#;
