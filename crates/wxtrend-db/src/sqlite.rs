//! Local SQLite file store

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection, Row};
use tracing::{debug, instrument};
use wxtrend_core::{ObservationRecord, RecordStore, StoreError, StoreResult, Timestamp};

use crate::schema::{COLUMNS, SQLITE_CREATE_TABLE};
use crate::{DbError, DbResult};

/// Record store backed by a single SQLite file.
///
/// `rusqlite::Connection` is not `Sync`, so the connection sits behind a
/// mutex and every statement runs on the blocking pool.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SQLITE_CREATE_TABLE)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> DbResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| DbError::TaskError("sqlite connection mutex poisoned".into()))
    }

    fn insert_sync(&self, record: &ObservationRecord) -> DbResult<()> {
        let conn = self.lock()?;
        let sql = format!(
            "INSERT INTO temperature_data ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            COLUMNS
        );
        conn.execute(
            &sql,
            params![
                record.timestamp,
                record.location,
                record.temperature,
                record.unit,
                record.dewpoint,
                record.windspeed,
                record.precipitation_last_6_hrs,
                record.windchill,
                record.heatindex,
            ],
        )?;
        Ok(())
    }

    fn select_sync(&self, cutoff: Option<Timestamp>) -> DbResult<Vec<ObservationRecord>> {
        let conn = self.lock()?;
        let records = match cutoff {
            Some(cutoff) => {
                let sql = format!(
                    "SELECT {} FROM temperature_data WHERE `timestamp` > ?1",
                    COLUMNS
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params![cutoff], read_record)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let sql = format!("SELECT {} FROM temperature_data", COLUMNS);
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map([], read_record)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(records)
    }

    async fn run_blocking<T, F>(&self, f: F) -> DbResult<T>
    where
        T: Send + 'static,
        F: FnOnce(SqliteStore) -> DbResult<T> + Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || f(store))
            .await
            .map_err(|e| DbError::TaskError(e.to_string()))?
    }
}

fn read_record(row: &Row<'_>) -> rusqlite::Result<ObservationRecord> {
    Ok(ObservationRecord {
        timestamp: row.get(0)?,
        location: row.get(1)?,
        temperature: row.get(2)?,
        unit: row.get(3)?,
        dewpoint: row.get(4)?,
        windspeed: row.get(5)?,
        precipitation_last_6_hrs: row.get(6)?,
        windchill: row.get(7)?,
        heatindex: row.get(8)?,
    })
}

#[async_trait::async_trait]
impl RecordStore for SqliteStore {
    #[instrument(skip(self, record), fields(timestamp = record.timestamp))]
    async fn append(&self, record: &ObservationRecord) -> StoreResult<()> {
        let record = record.clone();
        self.run_blocking(move |store| store.insert_sync(&record))
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?;
        debug!("Inserted observation");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn scan_all(&self) -> StoreResult<Vec<ObservationRecord>> {
        self.run_blocking(|store| store.select_sync(None))
            .await
            .map_err(|e| StoreError::Read(e.to_string()))
    }

    #[instrument(skip(self))]
    async fn scan_since(&self, cutoff: Timestamp) -> StoreResult<Vec<ObservationRecord>> {
        self.run_blocking(move |store| store.select_sync(Some(cutoff)))
            .await
            .map_err(|e| StoreError::Read(e.to_string()))
    }
}
