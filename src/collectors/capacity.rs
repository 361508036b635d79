//! Volume Capacity Extractor
//!
//! Derives the sizing record for a volume from the list response alone.
//!
//! # Fields Produced
//! - `size` - Provisioned volume size in bytes
//! - `serial` - Volume serial number
//! - `created` - Creation timestamp as reported by the array
//!
//! Tags: `name`

use crate::purefa::Volume;
use crate::record::MetricRecord;

/// Build the capacity record for one volume
pub fn capacity(volume: &Volume) -> MetricRecord {
    MetricRecord::for_volume(&volume.name)
        .with_field("size", volume.size)
        .with_field("serial", volume.serial.as_str())
        .with_field("created", volume.created.as_str())
}
