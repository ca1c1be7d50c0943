//! Seams between the ingestor, the aggregator, and their collaborators

use thiserror::Error;

use crate::{LatestObservation, ObservationRecord, Timestamp};

/// Failure reported by an observation source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("upstream returned {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("upstream unreachable: {0}")]
    Transport(String),

    #[error("malformed upstream payload: {0}")]
    Payload(String),

    #[error("invalid source configuration: {0}")]
    Config(String),
}

impl SourceError {
    /// HTTP status from upstream, when one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            SourceError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failure reported by a record store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store read failed: {0}")]
    Read(String),

    #[error("store write failed: {0}")]
    Write(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Provides the latest observation for one fixed station
#[async_trait::async_trait]
pub trait ObservationSource: Send + Sync {
    /// Source name/identifier
    fn name(&self) -> &str;

    async fn latest(&self) -> Result<LatestObservation, SourceError>;
}

/// Append-only store of observation records
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Add one record. Colliding timestamps are kept as separate records.
    async fn append(&self, record: &ObservationRecord) -> StoreResult<()>;

    /// Every record, in no particular order
    async fn scan_all(&self) -> StoreResult<Vec<ObservationRecord>>;

    /// Records with `timestamp > cutoff`
    async fn scan_since(&self, cutoff: Timestamp) -> StoreResult<Vec<ObservationRecord>> {
        let mut records = self.scan_all().await?;
        records.retain(|r| r.timestamp > cutoff);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct VecStore(Mutex<Vec<ObservationRecord>>);

    #[async_trait::async_trait]
    impl RecordStore for VecStore {
        async fn append(&self, record: &ObservationRecord) -> StoreResult<()> {
            self.0.lock().unwrap().push(record.clone());
            Ok(())
        }

        async fn scan_all(&self) -> StoreResult<Vec<ObservationRecord>> {
            Ok(self.0.lock().unwrap().clone())
        }
    }

    #[tokio::test]
    async fn test_default_scan_since_is_strict() {
        let store = VecStore(Mutex::new(Vec::new()));
        for t in [100, 200, 300] {
            store
                .append(&ObservationRecord::new(t, "here", 1.0, "C"))
                .await
                .unwrap();
        }

        let records = store.scan_since(200).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].timestamp, 300);
    }

    #[test]
    fn test_source_error_status() {
        let err = SourceError::Status {
            status: 503,
            reason: "Service Unavailable".into(),
        };
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.to_string(), "upstream returned 503: Service Unavailable");
        assert_eq!(SourceError::Transport("refused".into()).status(), None);
    }
}
