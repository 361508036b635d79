//! Metric records and the sink interface they are pushed into

use std::collections::BTreeMap;

/// Measurement name carried by every record this crate produces
pub const MEASUREMENT: &str = "purefa";

pub type Tags = BTreeMap<String, String>;
pub type Fields = BTreeMap<String, FieldValue>;

/// A single field value of a metric record
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl FieldValue {
    /// Numeric view of the value, `None` for strings
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(v) => Some(*v as f64),
            FieldValue::Float(v) => Some(*v),
            FieldValue::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Str(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Str(v.to_string())
    }
}

/// A tagged set of fields under one measurement
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    pub measurement: String,
    pub tags: Tags,
    pub fields: Fields,
}

impl MetricRecord {
    /// Empty `purefa` record tagged with a volume name
    pub fn for_volume(name: &str) -> Self {
        let mut tags = Tags::new();
        tags.insert("name".to_string(), name.to_string());
        Self {
            measurement: MEASUREMENT.to_string(),
            tags,
            fields: Fields::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Push this record into a sink
    pub fn emit(&self, acc: &mut dyn Accumulator) {
        acc.add_fields(&self.measurement, &self.fields, &self.tags);
    }
}

/// Sink accepting one tagged field set at a time
///
/// Emission is fire-and-forget: the collector never observes what the sink
/// does with a record.
pub trait Accumulator: Send {
    fn add_fields(&mut self, measurement: &str, fields: &Fields, tags: &Tags);
}

/// Records every emitted field set in memory
impl Accumulator for Vec<MetricRecord> {
    fn add_fields(&mut self, measurement: &str, fields: &Fields, tags: &Tags) {
        self.push(MetricRecord {
            measurement: measurement.to_string(),
            tags: tags.clone(),
            fields: fields.clone(),
        });
    }
}
