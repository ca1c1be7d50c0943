//! In-process record store

use std::sync::Arc;
use tokio::sync::RwLock;
use wxtrend_core::{ObservationRecord, RecordStore, StoreResult};

/// Record store held in memory; contents are lost on drop
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<Vec<ObservationRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `records`, in that scan order
    pub fn with_records(records: Vec<ObservationRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryStore {
    async fn append(&self, record: &ObservationRecord) -> StoreResult<()> {
        self.records.write().await.push(record.clone());
        Ok(())
    }

    async fn scan_all(&self) -> StoreResult<Vec<ObservationRecord>> {
        Ok(self.records.read().await.clone())
    }
}
