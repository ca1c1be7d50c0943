//! Windowed temperature summary logic

use tracing::{debug, info, instrument, warn};
use wxtrend_core::{
    summarize_records, summarize_window, window_cutoff, Extremes, RecordStore, SummaryOutcome,
    Timestamp,
};

use crate::{SummaryError, SummaryResult, DEFAULT_WINDOW_HOURS};

/// How the all-time and windowed record sets are read from the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanStrategy {
    /// `scan_all` for the extremes, `scan_since` for the window
    #[default]
    TwoPass,
    /// One `scan_all`, window filtered client-side
    SinglePass,
}

/// Computes summaries over a record store
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator {
    strategy: ScanStrategy,
}

impl Aggregator {
    pub fn new(strategy: ScanStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> ScanStrategy {
        self.strategy
    }

    /// Summarize the default 24 hour window
    pub async fn summarize_default(&self, store: &dyn RecordStore) -> SummaryResult<SummaryOutcome> {
        self.summarize(store, DEFAULT_WINDOW_HOURS).await
    }

    /// Summarize the trailing `window_hours` ending now
    pub async fn summarize(
        &self,
        store: &dyn RecordStore,
        window_hours: f64,
    ) -> SummaryResult<SummaryOutcome> {
        self.summarize_at(store, window_hours, chrono::Utc::now().timestamp())
            .await
    }

    /// Summarize the trailing `window_hours` ending at `now`
    #[instrument(skip(self, store))]
    pub async fn summarize_at(
        &self,
        store: &dyn RecordStore,
        window_hours: f64,
        now: Timestamp,
    ) -> SummaryResult<SummaryOutcome> {
        if !window_hours.is_finite() || window_hours < 0.0 {
            return Err(SummaryError::InvalidWindow(format!(
                "window_hours must be a non-negative number, got {}",
                window_hours
            )));
        }
        let cutoff = window_cutoff(now, window_hours);

        let outcome = match self.strategy {
            ScanStrategy::TwoPass => {
                let all = store.scan_all().await?;
                let all_time: Extremes = all.iter().collect();
                if all_time.is_empty() {
                    warn!("No temperature data found in the store");
                }

                let windowed = store.scan_since(cutoff).await?;
                debug!(
                    "Scanned {} records, {} inside window after {}",
                    all_time.count(),
                    windowed.len(),
                    cutoff
                );
                summarize_window(&windowed, &all_time)
            }
            ScanStrategy::SinglePass => {
                let all = store.scan_all().await?;
                if all.is_empty() {
                    warn!("No temperature data found in the store");
                }
                debug!("Scanned {} records, window after {}", all.len(), cutoff);
                summarize_records(&all, cutoff)
            }
        };

        match &outcome {
            SummaryOutcome::Summary(summary) => info!(
                "Summary: current {} min {} max {} avg {}",
                summary.current_temperature,
                summary.min_temperature,
                summary.max_temperature,
                summary.average_temperature
            ),
            SummaryOutcome::NoData => {
                warn!("No temperature data found in the past {} hours", window_hours)
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wxtrend_core::{ObservationRecord, StoreError, StoreResult};
    use wxtrend_db::MemoryStore;

    const NOW: Timestamp = 1_700_000_000;
    const HOUR: Timestamp = 3600;

    fn record(timestamp: Timestamp, temperature: f64) -> ObservationRecord {
        ObservationRecord::new(timestamp, "Plymouth, MN", temperature, "C")
    }

    struct BrokenStore;

    #[async_trait::async_trait]
    impl RecordStore for BrokenStore {
        async fn append(&self, _record: &ObservationRecord) -> StoreResult<()> {
            Ok(())
        }

        async fn scan_all(&self) -> StoreResult<Vec<ObservationRecord>> {
            Err(StoreError::Read("connection reset".into()))
        }
    }

    /// Full scan that has not caught up with the windowed scan yet
    struct LaggingStore(Vec<ObservationRecord>);

    #[async_trait::async_trait]
    impl RecordStore for LaggingStore {
        async fn append(&self, _record: &ObservationRecord) -> StoreResult<()> {
            Ok(())
        }

        async fn scan_all(&self) -> StoreResult<Vec<ObservationRecord>> {
            Ok(Vec::new())
        }

        async fn scan_since(&self, cutoff: Timestamp) -> StoreResult<Vec<ObservationRecord>> {
            Ok(self
                .0
                .iter()
                .filter(|r| r.timestamp > cutoff)
                .cloned()
                .collect())
        }
    }

    #[tokio::test]
    async fn test_window_without_all_time_extremes() {
        let store = LaggingStore(vec![record(NOW - HOUR, 22.25), record(NOW, 22.25)]);
        let outcome = Aggregator::new(ScanStrategy::TwoPass)
            .summarize_at(&store, 24.0, NOW)
            .await
            .unwrap();

        let summary = match outcome {
            SummaryOutcome::Summary(summary) => summary,
            SummaryOutcome::NoData => panic!("expected a summary, got NoData"),
        };
        assert_eq!(summary.min_temperature, 22.25);
        assert_eq!(summary.max_temperature, 22.25);
        assert_eq!(summary.current_temperature, 22.25);
        assert_eq!(summary.all_time_min_temperature, None);
        assert_eq!(summary.all_time_max_temperature, None);

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json["all_time_min_temperature"].is_null());
        assert!(json["all_time_max_temperature"].is_null());
    }

    #[tokio::test]
    async fn test_strategies_agree() {
        let store = MemoryStore::with_records(vec![
            record(NOW - 30 * HOUR, -8.0),
            record(NOW - 20 * HOUR, 3.5),
            record(NOW - 2 * HOUR, 7.25),
            record(NOW - HOUR, 6.0),
        ]);

        for hours in [0.5, 1.5, 24.0, 48.0] {
            let two = Aggregator::new(ScanStrategy::TwoPass)
                .summarize_at(&store, hours, NOW)
                .await
                .unwrap();
            let one = Aggregator::new(ScanStrategy::SinglePass)
                .summarize_at(&store, hours, NOW)
                .await
                .unwrap();
            assert_eq!(two, one, "window {}h", hours);
        }
    }

    #[tokio::test]
    async fn test_invalid_window_rejected() {
        let store = MemoryStore::new();
        let agg = Aggregator::default();

        for hours in [-1.0, f64::NAN, f64::INFINITY] {
            let err = agg.summarize_at(&store, hours, NOW).await.unwrap_err();
            assert!(matches!(err, SummaryError::InvalidWindow(_)));
        }
    }

    #[tokio::test]
    async fn test_store_read_failure_surfaces() {
        for strategy in [ScanStrategy::TwoPass, ScanStrategy::SinglePass] {
            let err = Aggregator::new(strategy)
                .summarize_default(&BrokenStore)
                .await
                .unwrap_err();
            assert!(matches!(err, SummaryError::StoreRead(StoreError::Read(_))));
        }
    }

    #[tokio::test]
    async fn test_zero_window_is_no_data() {
        let store = MemoryStore::with_records(vec![record(NOW, 1.0)]);
        let outcome = Aggregator::default()
            .summarize_at(&store, 0.0, NOW)
            .await
            .unwrap();
        assert!(outcome.is_no_data());
    }
}
