//! Volume Performance Extractor
//!
//! Fetches the monitor sample for a volume and turns it into a record.
//!
//! # Fields Produced
//! One float field per numeric counter in the monitor sample, e.g.
//! `reads_per_sec`, `writes_per_sec`, `input_per_sec`, `output_per_sec`,
//! `usec_per_read_op`, `usec_per_write_op`. The exact set depends on the
//! array firmware.
//!
//! Tags: `name`

use crate::error::Result;
use crate::purefa::{PureFaClient, Volume};
use crate::record::MetricRecord;
use tracing::debug;

/// Build the performance record for one volume
///
/// Issues one monitor request. Fails with the same errors as the volume
/// list call (`Auth`, `UnexpectedStatus`, `Transport`, `Decode`).
pub async fn performance(client: &PureFaClient, volume: &Volume) -> Result<MetricRecord> {
    let sample = client.volume_performance(&volume.name).await?;
    debug!(
        "Volume {} reported {} performance counters",
        volume.name,
        sample.counters.len()
    );

    let mut record = MetricRecord::for_volume(&volume.name);
    for (counter, value) in sample.counters {
        record = record.with_field(&counter, value);
    }
    Ok(record)
}
