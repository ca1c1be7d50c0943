use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use opentelemetry::metrics::{Counter, MeterProvider};
use opentelemetry::KeyValue;
use opentelemetry_prometheus::exporter;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use prometheus::{Encoder, Registry, TextEncoder};
use serde::Deserialize;
use serde_json::json;
use wxtrend_core::{RecordStore, SummaryOutcome};
use wxtrend_ingest::{IngestError, Ingestor};
use wxtrend_summary::{Aggregator, SummaryError};

pub struct AppState {
    ready: AtomicBool,
    registry: Registry,
    #[allow(dead_code)]
    provider: SdkMeterProvider,
    requests_total: Counter<u64>,
    ingests_total: Counter<u64>,
    summaries_total: Counter<u64>,
    store: Arc<dyn RecordStore>,
    ingestor: Ingestor,
    aggregator: Aggregator,
    window_hours: f64,
}

pub fn build_app(
    store: Arc<dyn RecordStore>,
    ingestor: Ingestor,
    aggregator: Aggregator,
    window_hours: f64,
) -> Result<(Router, Arc<AppState>)> {
    // Prometheus exporter via OpenTelemetry
    let registry = Registry::new();
    let reader = exporter().with_registry(registry.clone()).build()?;
    let provider = SdkMeterProvider::builder().with_reader(reader).build();
    let meter = provider.meter("wxtrend-api");

    let requests_total = meter
        .u64_counter("wxtrend_requests_total")
        .with_description("Total HTTP requests served")
        .init();
    let ingests_total = meter
        .u64_counter("wxtrend_ingests_total")
        .with_description("Ingest invocations by outcome")
        .init();
    let summaries_total = meter
        .u64_counter("wxtrend_summaries_total")
        .with_description("Summary invocations by outcome")
        .init();

    let state = Arc::new(AppState {
        ready: AtomicBool::new(false),
        registry,
        provider,
        requests_total,
        ingests_total,
        summaries_total,
        store,
        ingestor,
        aggregator,
        window_hours,
    });

    let router = Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/ingest", post(ingest))
        .route("/summary", get(summary))
        .with_state(Arc::clone(&state));

    Ok((router, state))
}

pub fn set_ready(state: &Arc<AppState>, is_ready: bool) {
    state.ready.store(is_ready, Ordering::Relaxed);
}

async fn healthz(State(state): State<Arc<AppState>>) -> StatusCode {
    state.requests_total.add(1, &[]);
    StatusCode::OK
}

async fn readyz(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.ready.load(Ordering::Relaxed) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn metrics(
    State(state): State<Arc<AppState>>,
) -> (
    [(axum::http::header::HeaderName, axum::http::HeaderValue); 1],
    String,
) {
    let encoder = TextEncoder::new();
    let metric_families = state.registry.gather();
    let mut buf = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buf) {
        tracing::warn!(error=?e, "failed to encode metrics");
    }
    let body = String::from_utf8(buf).unwrap_or_default();
    let header = (
        header::CONTENT_TYPE,
        axum::http::HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    ([header], body)
}

async fn ingest(State(state): State<Arc<AppState>>) -> Response {
    state.requests_total.add(1, &[]);

    match state.ingestor.ingest(state.store.as_ref()).await {
        Ok(confirmation) => {
            state.ingests_total.add(1, &[KeyValue::new("outcome", "ok")]);
            (StatusCode::OK, Json(confirmation)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "ingest failed");
            state
                .ingests_total
                .add(1, &[KeyValue::new("outcome", "error")]);
            ingest_error_response(&e)
        }
    }
}

fn ingest_error_response(e: &IngestError) -> Response {
    let status = match e {
        IngestError::Fetch(_) => StatusCode::BAD_GATEWAY,
        IngestError::MissingTemperature => StatusCode::UNPROCESSABLE_ENTITY,
        IngestError::StoreWrite(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let body = json!({
        "error": e.to_string(),
        "upstream_status": e.upstream_status(),
    });
    (status, Json(body)).into_response()
}

#[derive(Deserialize)]
struct SummaryQuery {
    window_hours: Option<f64>,
}

async fn summary(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SummaryQuery>,
) -> Response {
    state.requests_total.add(1, &[]);
    let window_hours = q.window_hours.unwrap_or(state.window_hours);

    match state
        .aggregator
        .summarize(state.store.as_ref(), window_hours)
        .await
    {
        Ok(SummaryOutcome::Summary(summary)) => {
            state
                .summaries_total
                .add(1, &[KeyValue::new("outcome", "ok")]);
            (StatusCode::OK, Json(summary)).into_response()
        }
        Ok(SummaryOutcome::NoData) => {
            state
                .summaries_total
                .add(1, &[KeyValue::new("outcome", "no_data")]);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "summary failed");
            state
                .summaries_total
                .add(1, &[KeyValue::new("outcome", "error")]);
            let status = match &e {
                SummaryError::InvalidWindow(_) => StatusCode::BAD_REQUEST,
                SummaryError::StoreRead(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}
