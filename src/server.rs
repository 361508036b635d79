//! HTTP Server and Metrics Collection
//!
//! This module implements the Prometheus exporter HTTP server and the polling loop
//! that drives [`PureFaCollector::gather`].
//!
//! # Endpoints
//!
//! - `GET /` - HTML landing page with links to metrics and health
//! - `GET /metrics` - Prometheus metrics in text format
//! - `GET /health` - Health check (returns 200 if the array is reachable, 503 otherwise)
//!
//! # Metrics Collection
//!
//! The collection loop runs every N seconds (configured via `scrape_interval_seconds`).
//! Each poll gathers into an in-memory buffer first and only then replaces the
//! exported per-volume series, so a scrape never observes a half-finished poll.
//! Only one poll runs at a time.
//!
//! When the volume list itself fails, `purefa_up` drops to 0 and the
//! per-volume series from the last successful poll are left in place. They
//! are stale until the next successful poll replaces them.
//! `purefa_collection_duration_seconds` is updated after every poll, failed
//! or not.

use crate::collectors::PureFaCollector;
use crate::config::Config;
use crate::error::ExporterError;
use crate::metrics::MetricsCollector;
use crate::record::MetricRecord;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{interval, Duration};
use tracing::{error, info, warn};

#[derive(Clone)]
struct AppState {
    metrics: MetricsCollector,
}

pub async fn start(config: Config) -> anyhow::Result<()> {
    let array = config.purefa.clone().init()?;
    info!("Collecting from {}", array.base_url);

    let collector = PureFaCollector::new(array)?
        .with_performance_metrics(config.metrics.collect_performance_metrics);
    let collector = Arc::new(collector);
    let metrics = MetricsCollector::new()?;

    // Start background metrics collection
    let loop_metrics = metrics.clone();
    let period = Duration::from_secs(config.metrics.scrape_interval_seconds.max(1));
    tokio::spawn(async move {
        collect_metrics_loop(collector, loop_metrics, period).await;
    });

    // Build the router
    let app = Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .with_state(AppState { metrics });

    // Start the server
    let addr = format!("{}:{}", config.server.addr, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ExporterError::Server(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("Metrics server listening on {}", addr);
    info!("Metrics available at http://{}/metrics", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn collect_metrics_loop(
    collector: Arc<PureFaCollector>,
    mut metrics: MetricsCollector,
    period: Duration,
) {
    let mut ticker = interval(period);

    loop {
        ticker.tick().await;
        collect_metrics(&collector, &mut metrics).await;
    }
}

/// Run one poll and publish its records
pub async fn collect_metrics(collector: &PureFaCollector, metrics: &mut MetricsCollector) {
    info!("Collecting metrics from FlashArray");
    let started = Instant::now();

    let mut records: Vec<MetricRecord> = Vec::new();
    let result = collector.gather(&mut records).await;

    let failed_volumes = match &result {
        Ok(()) => Some(0),
        Err(ExporterError::Volumes(failures)) => {
            warn!("{}", failures);
            Some(failures.len() as i64)
        }
        Err(e) => {
            error!("Failed to collect metrics: {}", e);
            None
        }
    };

    match failed_volumes {
        Some(count) => {
            metrics.reset_volumes();
            for record in &records {
                record.emit(&mut *metrics);
            }
            metrics.volume_failures.set(count);
            metrics.up.set(1.0);
        }
        None => metrics.up.set(0.0),
    }
    metrics
        .collection_duration_seconds
        .set(started.elapsed().as_secs_f64());
}

async fn root_handler() -> impl IntoResponse {
    axum::response::Html(
        r#"<html>
<head><title>FlashArray Exporter</title></head>
<body>
<h1>Pure Storage FlashArray Exporter</h1>
<p><a href="/metrics">Metrics</a></p>
<p><a href="/health">Health</a></p>
</body>
</html>"#,
    )
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(metrics) => metrics.into_response(),
        Err(e) => {
            error!("Failed to render metrics: {}", e);
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error rendering metrics: {}", e),
            )
                .into_response()
        }
    }
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let up_value = state.metrics.up.get();

    if up_value > 0.0 {
        (axum::http::StatusCode::OK, "OK")
    } else {
        (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            "FlashArray API unreachable",
        )
    }
}
