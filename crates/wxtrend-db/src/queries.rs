//! Query operations on the MySQL observation table

use crate::schema::{ObservationRow, COLUMNS, MYSQL_CREATE_TABLE};
use crate::{DbClient, DbResult};
use tracing::{debug, instrument};
use wxtrend_core::{ObservationRecord, RecordStore, StoreError, StoreResult, Timestamp};

impl DbClient {
    /// Create the observation table if it does not exist yet
    pub async fn ensure_schema(&self) -> DbResult<()> {
        sqlx::query(MYSQL_CREATE_TABLE).execute(self.pool()).await?;
        Ok(())
    }

    /// Insert a single observation row
    #[instrument(skip(self, row))]
    pub async fn insert_observation(&self, row: &ObservationRow) -> DbResult<()> {
        let sql = format!(
            "INSERT INTO temperature_data ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            COLUMNS
        );
        sqlx::query(&sql)
            .bind(row.timestamp)
            .bind(&row.location)
            .bind(row.temperature)
            .bind(&row.unit)
            .bind(row.dewpoint)
            .bind(row.windspeed)
            .bind(row.precipitation_last_6_hrs)
            .bind(row.windchill)
            .bind(row.heatindex)
            .execute(self.pool())
            .await?;

        debug!("Inserted observation for timestamp {}", row.timestamp);
        Ok(())
    }

    /// Get every observation row
    #[instrument(skip(self))]
    pub async fn scan_observations(&self) -> DbResult<Vec<ObservationRow>> {
        let sql = format!("SELECT {} FROM temperature_data", COLUMNS);
        let rows = sqlx::query_as::<_, ObservationRow>(&sql)
            .fetch_all(self.pool())
            .await?;

        debug!("Scanned {} observation rows", rows.len());
        Ok(rows)
    }

    /// Get observation rows strictly newer than `cutoff`
    #[instrument(skip(self))]
    pub async fn scan_observations_since(&self, cutoff: i64) -> DbResult<Vec<ObservationRow>> {
        let sql = format!(
            "SELECT {} FROM temperature_data WHERE `timestamp` > ?",
            COLUMNS
        );
        let rows = sqlx::query_as::<_, ObservationRow>(&sql)
            .bind(cutoff)
            .fetch_all(self.pool())
            .await?;

        debug!("Retrieved {} observation rows after {}", rows.len(), cutoff);
        Ok(rows)
    }
}

#[async_trait::async_trait]
impl RecordStore for DbClient {
    async fn append(&self, record: &ObservationRecord) -> StoreResult<()> {
        self.insert_observation(&ObservationRow::from(record))
            .await
            .map_err(|e| StoreError::Write(e.to_string()))
    }

    async fn scan_all(&self) -> StoreResult<Vec<ObservationRecord>> {
        let rows = self
            .scan_observations()
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?;
        Ok(rows.into_iter().map(ObservationRecord::from).collect())
    }

    async fn scan_since(&self, cutoff: Timestamp) -> StoreResult<Vec<ObservationRecord>> {
        let rows = self
            .scan_observations_since(cutoff)
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?;
        Ok(rows.into_iter().map(ObservationRecord::from).collect())
    }
}
