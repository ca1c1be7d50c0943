//! Record store backends for wxtrend
//!
//! Every backend implements [`wxtrend_core::RecordStore`]. The store is
//! append-only: nothing here updates or deletes observation records.

pub mod client;
pub mod memory;
pub mod queries;
pub mod schema;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use client::*;
pub use memory::*;
pub use schema::*;
#[cfg(feature = "sqlite")]
pub use sqlite::*;

use std::sync::Arc;
use thiserror::Error;
use wxtrend_core::RecordStore;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Background task failed: {0}")]
    TaskError(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Open the store named by `url`.
///
/// Supported forms: `mysql://...`, `sqlite://<path>`, `memory:`.
pub async fn open_store(url: &str) -> DbResult<Arc<dyn RecordStore>> {
    if url.starts_with("mysql://") {
        let client = DbClient::new(url).await?;
        client.ensure_schema().await?;
        return Ok(Arc::new(client));
    }

    if url == "memory:" {
        return Ok(Arc::new(MemoryStore::new()));
    }

    if let Some(path) = url.strip_prefix("sqlite://") {
        #[cfg(feature = "sqlite")]
        {
            return Ok(Arc::new(SqliteStore::open(path)?));
        }
        #[cfg(not(feature = "sqlite"))]
        {
            return Err(DbError::ConfigError(format!(
                "sqlite support not compiled in (path {})",
                path
            )));
        }
    }

    Err(DbError::ConfigError(format!("Unsupported store URL: {}", url)))
}
