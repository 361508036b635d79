//! Prometheus Metrics Definitions
//!
//! [`MetricsCollector`] is the Prometheus-backed [`Accumulator`]: every
//! record the collector emits is folded into the gauges below.
//!
//! # Metric Categories
//!
//! ## Capacity
//! - `purefa_volume_size_bytes` - Provisioned size, from the `size` field of
//!   capacity records (those carrying `serial` and `created`)
//! - `purefa_volume_info` - Serial and creation time (value is always 1)
//!
//! ## Performance
//! - `purefa_volume_performance` - One series per monitor counter
//!
//! ## Collector Health
//! - `purefa_up` - Whether the last poll listed volumes successfully
//! - `purefa_volume_failures` - Volumes whose extraction failed in the last poll
//! - `purefa_collection_duration_seconds` - Duration of the last poll
//!
//! All metrics use the `purefa_` namespace prefix.

use crate::record::{Accumulator, FieldValue, Fields, Tags};
use prometheus::{Encoder, Gauge, GaugeVec, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder};
use std::sync::Arc;
use tracing::debug;

/// Metrics collector for FlashArray volumes
#[derive(Clone)]
pub struct MetricsCollector {
    registry: Arc<Registry>,

    // Volume metrics
    pub volume_size_bytes: Arc<GaugeVec>,
    pub volume_info: Arc<IntGaugeVec>,
    pub volume_performance: Arc<GaugeVec>,

    // Collector metrics
    pub up: Arc<Gauge>,
    pub volume_failures: Arc<IntGauge>,
    pub collection_duration_seconds: Arc<Gauge>,
}

impl MetricsCollector {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let volume_size_bytes = GaugeVec::new(
            Opts::new("volume_size_bytes", "Provisioned size of the volume in bytes")
                .namespace("purefa"),
            &["volume"],
        )?;

        let volume_info = IntGaugeVec::new(
            Opts::new("volume_info", "Volume information (value is always 1)")
                .namespace("purefa"),
            &["volume", "serial", "created"],
        )?;

        let volume_performance = GaugeVec::new(
            Opts::new(
                "volume_performance",
                "Volume performance counter from the array monitor endpoint",
            )
            .namespace("purefa"),
            &["volume", "counter"],
        )?;

        let up = Gauge::new(
            "purefa_up",
            "Whether the FlashArray API is reachable (1=up, 0=down)",
        )?;

        let volume_failures = IntGauge::new(
            "purefa_volume_failures",
            "Number of volumes whose metrics failed to collect in the last poll",
        )?;

        let collection_duration_seconds = Gauge::new(
            "purefa_collection_duration_seconds",
            "Duration of the last collection in seconds",
        )?;

        // Register all metrics
        registry.register(Box::new(volume_size_bytes.clone()))?;
        registry.register(Box::new(volume_info.clone()))?;
        registry.register(Box::new(volume_performance.clone()))?;
        registry.register(Box::new(up.clone()))?;
        registry.register(Box::new(volume_failures.clone()))?;
        registry.register(Box::new(collection_duration_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            volume_size_bytes: Arc::new(volume_size_bytes),
            volume_info: Arc::new(volume_info),
            volume_performance: Arc::new(volume_performance),
            up: Arc::new(up),
            volume_failures: Arc::new(volume_failures),
            collection_duration_seconds: Arc::new(collection_duration_seconds),
        })
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Drop all per-volume series so deleted volumes stop being exported
    pub fn reset_volumes(&self) {
        self.volume_size_bytes.reset();
        self.volume_info.reset();
        self.volume_performance.reset();
    }
}

impl Accumulator for MetricsCollector {
    fn add_fields(&mut self, measurement: &str, fields: &Fields, tags: &Tags) {
        let Some(volume) = tags.get("name") else {
            debug!("Dropping {} record without a name tag", measurement);
            return;
        };

        // Capacity records carry serial and created; anything else is a
        // monitor sample, whose counters may use any name, including `size`.
        let serial = fields.get("serial").and_then(FieldValue::as_str);
        let created = fields.get("created").and_then(FieldValue::as_str);
        if let (Some(serial), Some(created)) = (serial, created) {
            self.volume_info
                .with_label_values(&[volume.as_str(), serial, created])
                .set(1);
            if let Some(size) = fields.get("size").and_then(FieldValue::as_f64) {
                self.volume_size_bytes
                    .with_label_values(&[volume.as_str()])
                    .set(size);
            }
            return;
        }

        for (key, value) in fields {
            let Some(v) = value.as_f64() else {
                continue;
            };
            self.volume_performance
                .with_label_values(&[volume.as_str(), key.as_str()])
                .set(v);
        }
    }
}
