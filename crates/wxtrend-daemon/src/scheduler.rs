//! Periodic ingest trigger

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info};
use wxtrend_core::RecordStore;
use wxtrend_ingest::Ingestor;

/// Scheduler fires one ingest per interval
pub struct Scheduler {
    ingestor: Ingestor,
    store: Arc<dyn RecordStore>,
    period: Duration,
    running: bool,
    succeeded: u64,
    failed: u64,
}

impl Scheduler {
    pub fn new(ingestor: Ingestor, store: Arc<dyn RecordStore>, period: Duration) -> Self {
        Self {
            ingestor,
            store,
            period,
            running: false,
            succeeded: 0,
            failed: 0,
        }
    }

    /// Run the ingest loop. The first ingest happens immediately.
    pub async fn run(&mut self) -> Result<()> {
        self.running = true;

        info!("Scheduler started");
        info!("Ingest interval: {}s", self.period.as_secs());
        info!("Source: {}", self.ingestor.source_name());

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while self.running {
            ticker.tick().await;
            if let Err(e) = self.run_once().await {
                // Next tick is the retry
                error!("Ingest failed: {:#}", e);
            }
        }

        info!("Scheduler stopped");
        Ok(())
    }

    /// Perform a single ingest
    pub async fn run_once(&mut self) -> Result<()> {
        let result = self
            .ingestor
            .ingest(self.store.as_ref())
            .await
            .context("Failed to ingest observation");

        match &result {
            Ok(confirmation) => {
                self.succeeded += 1;
                info!(
                    "Ingested record: timestamp={}, temperature={} {}",
                    confirmation.timestamp, confirmation.temperature, confirmation.unit
                );
            }
            Err(_) => self.failed += 1,
        }

        result.map(|_| ())
    }

    /// Stop the scheduler after the current ingest
    pub fn stop(&mut self) {
        info!("Stopping scheduler...");
        self.running = false;
    }

    /// (succeeded, failed) ingest counts since start
    pub fn counts(&self) -> (u64, u64) {
        (self.succeeded, self.failed)
    }

    #[allow(dead_code)]
    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use wxtrend_core::{LatestObservation, ObservationSource, SourceError};
    use wxtrend_db::MemoryStore;
    use wxtrend_ingest::SimulatorSource;

    /// Fails every other call
    struct FlakySource(AtomicU32);

    #[async_trait::async_trait]
    impl ObservationSource for FlakySource {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn latest(&self) -> Result<LatestObservation, SourceError> {
            if self.0.fetch_add(1, Ordering::Relaxed) % 2 == 0 {
                Err(SourceError::Transport("connection refused".into()))
            } else {
                Ok(LatestObservation {
                    temperature: Some(12.0),
                    ..Default::default()
                })
            }
        }
    }

    #[tokio::test]
    async fn test_run_once_appends() {
        let store = MemoryStore::new();
        let ingestor = Ingestor::new(Arc::new(SimulatorSource::default()), "Plymouth, MN");
        let mut scheduler = Scheduler::new(ingestor, Arc::new(store.clone()), Duration::from_secs(1));

        scheduler.run_once().await.unwrap();
        scheduler.run_once().await.unwrap();

        assert_eq!(store.len().await, 2);
        assert_eq!(scheduler.counts(), (2, 0));
    }

    #[tokio::test]
    async fn test_failures_are_counted_not_fatal() {
        let store = MemoryStore::new();
        let ingestor = Ingestor::new(Arc::new(FlakySource(AtomicU32::new(0))), "Plymouth, MN");
        let mut scheduler = Scheduler::new(ingestor, Arc::new(store.clone()), Duration::from_secs(1));

        assert!(scheduler.run_once().await.is_err());
        assert!(scheduler.run_once().await.is_ok());
        assert!(scheduler.run_once().await.is_err());

        assert_eq!(scheduler.counts(), (1, 2));
        assert_eq!(store.len().await, 1);
    }

    #[test]
    fn test_stop() {
        let ingestor = Ingestor::new(Arc::new(SimulatorSource::default()), "Plymouth, MN");
        let mut scheduler =
            Scheduler::new(ingestor, Arc::new(MemoryStore::new()), Duration::from_secs(1));
        assert!(!scheduler.is_running());
        scheduler.stop();
        assert!(!scheduler.is_running());
    }
}
