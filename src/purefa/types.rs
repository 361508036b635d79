//! FlashArray API Type Definitions
//!
//! Structs for the REST 1.x responses the collector consumes, plus the
//! decoders that turn a response body into them.
//!
//! # API Endpoints Covered
//!
//! - `GET /volume` → [`Volume`] (see [`decode_volumes`])
//! - `GET /volume/{name}?action=monitor` → [`VolumePerformance`] (see [`decode_performance`])
//!
//! Unknown fields are ignored so newer firmware responses still decode.

use crate::error::Result;
use serde::de::Error as _;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Volume entry from `GET /volume`
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Volume {
    pub created: String,
    pub name: String,
    pub serial: String,
    pub size: i64,
}

/// One monitor sample for a volume
///
/// The counter set is owned by the array firmware (API 1.15 reports fields
/// such as `reads_per_sec`, `input_per_sec` and `usec_per_read_op`), so every
/// numeric field of the sample is kept under its own name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VolumePerformance {
    pub name: Option<String>,
    pub time: Option<String>,
    pub counters: BTreeMap<String, f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MonitorResponse {
    Samples(Vec<serde_json::Map<String, serde_json::Value>>),
    Sample(serde_json::Map<String, serde_json::Value>),
}

/// Decode the body of `GET /volume`
pub fn decode_volumes(body: &[u8]) -> Result<Vec<Volume>> {
    Ok(serde_json::from_slice(body)?)
}

/// Decode the body of a volume monitor request
///
/// Accepts the array-of-samples shape the API returns as well as a bare
/// object. Only the first sample is used.
pub fn decode_performance(body: &[u8]) -> Result<VolumePerformance> {
    let sample = match serde_json::from_slice::<MonitorResponse>(body)? {
        MonitorResponse::Sample(sample) => sample,
        MonitorResponse::Samples(samples) => samples
            .into_iter()
            .next()
            .ok_or_else(|| serde_json::Error::custom("monitor response contained no samples"))?,
    };

    let mut perf = VolumePerformance::default();
    for (key, value) in sample {
        match (key.as_str(), value) {
            ("name", serde_json::Value::String(s)) => perf.name = Some(s),
            ("time", serde_json::Value::String(s)) => perf.time = Some(s),
            (_, serde_json::Value::Number(n)) => {
                if let Some(v) = n.as_f64() {
                    perf.counters.insert(key, v);
                }
            }
            _ => {}
        }
    }
    Ok(perf)
}
