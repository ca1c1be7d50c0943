use wxtrend_core::{ObservationRecord, RecordStore, SummaryOutcome, Timestamp};
use wxtrend_db::{MemoryStore, SqliteStore};
use wxtrend_summary::{Aggregator, ScanStrategy, DEFAULT_WINDOW_HOURS};

const NOW: Timestamp = 1_700_000_000;

fn record(timestamp: Timestamp, temperature: f64) -> ObservationRecord {
    ObservationRecord::new(timestamp, "Plymouth, MN", temperature, "C")
}

#[tokio::test]
async fn three_record_window() {
    let mut last = record(NOW - 100, 22.0);
    last.dewpoint = None;
    let store = MemoryStore::with_records(vec![record(NOW - 300, 20.0), record(NOW - 200, 25.0), last]);

    let outcome = Aggregator::default()
        .summarize_at(&store, DEFAULT_WINDOW_HOURS, NOW)
        .await
        .unwrap();
    let summary = outcome.summary().expect("window has records");

    assert_eq!(summary.min_temperature, 20.0);
    assert_eq!(summary.max_temperature, 25.0);
    assert_eq!(summary.average_temperature, 22.3);
    assert_eq!(summary.current_temperature, 22.0);
    assert_eq!(summary.current_dewpoint, 0.0);
    assert_eq!(summary.all_time_min_temperature, Some(20.0));
    assert_eq!(summary.all_time_max_temperature, Some(25.0));
}

#[tokio::test]
async fn empty_store_is_no_data() {
    let store = MemoryStore::new();

    for strategy in [ScanStrategy::TwoPass, ScanStrategy::SinglePass] {
        let outcome = Aggregator::new(strategy)
            .summarize_at(&store, DEFAULT_WINDOW_HOURS, NOW)
            .await
            .unwrap();
        assert_eq!(outcome, SummaryOutcome::NoData);
    }
}

#[tokio::test]
async fn stale_store_is_no_data() {
    let store = MemoryStore::with_records(vec![record(NOW - 25 * 3600, 12.0)]);

    let outcome = Aggregator::default()
        .summarize_at(&store, DEFAULT_WINDOW_HOURS, NOW)
        .await
        .unwrap();
    assert!(outcome.is_no_data());
}

#[tokio::test]
async fn window_boundary_is_exclusive() {
    let cutoff = NOW - 24 * 3600;
    let store = MemoryStore::with_records(vec![record(cutoff, -30.0), record(cutoff + 1, 4.0)]);

    let outcome = Aggregator::default()
        .summarize_at(&store, DEFAULT_WINDOW_HOURS, NOW)
        .await
        .unwrap();
    let summary = outcome.summary().unwrap();

    assert_eq!(summary.min_temperature, 4.0);
    assert_eq!(summary.all_time_min_temperature, Some(-30.0));
}

#[tokio::test]
async fn all_time_extremes_widen_as_store_grows() {
    let store = MemoryStore::new();
    let agg = Aggregator::default();
    let temps = [10.0, 12.5, 8.0, 8.0, 15.0, -1.0];
    let mut previous: Option<(f64, f64)> = None;

    for (i, temp) in temps.into_iter().enumerate() {
        let now = NOW + i as Timestamp * 600;
        store.append(&record(now, temp)).await.unwrap();

        let outcome = agg.summarize_at(&store, 1.0, now).await.unwrap();
        let summary = outcome.summary().unwrap();
        let min = summary.all_time_min_temperature.unwrap();
        let max = summary.all_time_max_temperature.unwrap();
        if let Some((prev_min, prev_max)) = previous {
            assert!(min <= prev_min);
            assert!(max >= prev_max);
        }
        assert_eq!(summary.current_temperature, temp);
        previous = Some((min, max));
    }
}

#[tokio::test]
async fn sqlite_store_matches_memory_store() {
    let dir = tempfile::tempdir().unwrap();
    let sqlite = SqliteStore::open(dir.path().join("wxtrend.db")).unwrap();
    let memory = MemoryStore::new();

    let mut newest = record(NOW - 60, 17.4);
    newest.windspeed = Some(14.8);
    newest.precipitation_last_6_hrs = Some(2.3);
    let records = vec![
        record(NOW - 40 * 3600, 31.0),
        record(NOW - 5 * 3600, 11.9),
        newest,
        record(NOW - 3600, 14.2),
    ];
    for r in &records {
        sqlite.append(r).await.unwrap();
        memory.append(r).await.unwrap();
    }

    let agg = Aggregator::new(ScanStrategy::TwoPass);
    let from_sqlite = agg.summarize_at(&sqlite, 24.0, NOW).await.unwrap();
    let from_memory = agg.summarize_at(&memory, 24.0, NOW).await.unwrap();
    assert_eq!(from_sqlite, from_memory);

    let summary = from_sqlite.summary().unwrap();
    assert_eq!(summary.current_temperature, 17.4);
    assert_eq!(summary.current_windspeed, 14.8);
    assert_eq!(summary.precipitation_6_hr, 2.3);
    assert_eq!(summary.all_time_max_temperature, Some(31.0));
    assert_eq!(summary.max_temperature, 17.4);
}
