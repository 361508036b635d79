//! Volume Metrics Collection
//!
//! [`PureFaCollector`] runs one poll against a FlashArray: it lists the
//! volumes, then derives a capacity record and a performance record for
//! each of them, pushing every record into the [`Accumulator`] as soon as
//! it is built.
//!
//! # Error Handling
//!
//! - A failed volume list aborts the poll before anything is emitted.
//! - A failed per-volume extraction is logged and remembered; the remaining
//!   volumes are still processed and the poll ends with
//!   [`ExporterError::Volumes`] listing every failure.
//!
//! Requests are issued one after another, never concurrently, to keep the
//! load on the array's management API bounded.

use crate::config::ArrayConfig;
use crate::error::{ExporterError, Result, VolumeError, VolumeFailures};
use crate::purefa::{PureFaClient, Volume};
use crate::record::Accumulator;
use tracing::{debug, info, warn};

pub mod capacity;
pub mod performance;

pub use capacity::capacity;
pub use performance::performance;

/// Name prefix of the volume copies Veeam creates on the array
const VEEAM_SNAPSHOT_PREFIX: &str = "VEEAM-";

/// Whether a volume looks like a Veeam-created snapshot copy
pub fn is_veeam_snapshot(volume: &Volume) -> bool {
    volume
        .name
        .get(..VEEAM_SNAPSHOT_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(VEEAM_SNAPSHOT_PREFIX))
}

/// Collector for one FlashArray
///
/// Owns the validated configuration and the HTTP client for its lifetime.
/// `gather` is expected to be called by a single scheduler task.
pub struct PureFaCollector {
    client: PureFaClient,
    collect_performance: bool,
}

impl PureFaCollector {
    pub fn new(config: ArrayConfig) -> Result<Self> {
        Ok(Self {
            client: PureFaClient::new(config)?,
            collect_performance: true,
        })
    }

    /// Enable or disable the per-volume monitor requests
    pub fn with_performance_metrics(mut self, enabled: bool) -> Self {
        self.collect_performance = enabled;
        self
    }

    /// Gather capacity and performance metrics for every volume
    pub async fn gather(&self, acc: &mut dyn Accumulator) -> Result<()> {
        let mut volumes = self.client.list_volumes().await?;
        debug!("Array listed {} volumes", volumes.len());

        if self.client.config().ignore_veeamsnap {
            let before = volumes.len();
            volumes.retain(|v| !is_veeam_snapshot(v));
            if volumes.len() != before {
                debug!("Skipped {} Veeam snapshot volumes", before - volumes.len());
            }
        }

        let mut failures = Vec::new();
        for volume in &volumes {
            capacity(volume).emit(acc);

            if !self.collect_performance {
                continue;
            }
            match performance(&self.client, volume).await {
                Ok(record) => record.emit(acc),
                Err(e) => {
                    warn!("Failed to collect performance for volume {}: {}", volume.name, e);
                    failures.push(VolumeError {
                        volume: volume.name.clone(),
                        source: e,
                    });
                }
            }
        }

        if !failures.is_empty() {
            return Err(ExporterError::Volumes(VolumeFailures {
                total: volumes.len(),
                failures,
            }));
        }

        info!("Updated metrics for {} volumes", volumes.len());
        Ok(())
    }
}
