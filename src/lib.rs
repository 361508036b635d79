//! Pure Storage FlashArray Collector
//!
//! Polls a FlashArray's REST API (v1.15) and derives capacity and performance
//! metrics for every volume, pushing them into a metrics sink.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐      HTTPS/REST      ┌──────────────────┐
//! │ FlashArray  │ ◄─────────────────►  │ PureFaCollector  │
//! │             │  Token auth, JSON    │                  │
//! └─────────────┘                      │  ┌────────────┐  │
//!                                      │  │PureFaClient│  │
//!                                      │  └────────────┘  │
//!                                      │  capacity()      │   records   ┌─────────────┐
//!                                      │  performance()   │ ──────────► │ Accumulator │
//!                                      └──────────────────┘             └─────────────┘
//! ```
//!
//! Per poll: one `GET /volume`, then one `GET /volume/{name}?action=monitor`
//! per volume, all issued sequentially.
//!
//! # Modules
//!
//! - [`purefa`] - REST client and API type definitions
//! - [`collectors`] - Capacity/performance extraction and the per-poll orchestrator
//! - [`record`] - Metric records and the [`record::Accumulator`] sink trait
//! - [`metrics`] - Prometheus-backed accumulator
//! - [`server`] - HTTP server and polling loop
//! - [`config`] - Configuration loading and validation
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use purefa_exporter::{collectors::PureFaCollector, config::Config, record::MetricRecord};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/Default.toml")?;
//!     let collector = PureFaCollector::new(config.purefa.init()?)?;
//!
//!     let mut records: Vec<MetricRecord> = Vec::new();
//!     collector.gather(&mut records).await?;
//!     Ok(())
//! }
//! ```

pub mod collectors;
pub mod config;
pub mod error;
pub mod metrics;
pub mod purefa;
pub mod record;
pub mod server;
