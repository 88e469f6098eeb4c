//! On-disk shape of the config record.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::graph::EdgeRecord;

/// The JSON document written by `save` and read by `load`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigRecord {
    /// Every edge with its ratio; an absent key loads as no edges
    #[serde(default)]
    pub edges: Vec<EdgeEntry>,
    /// First save time, `YYYY-MM-DD HH:MM:SS`; empty when never saved
    #[serde(default)]
    pub created_time: String,
    /// Latest save time, `YYYY-MM-DD HH:MM:SS`
    #[serde(default)]
    pub last_modified: String,
    /// Informational; recomputed on every save and ignored on load
    #[serde(default)]
    pub node_count: usize,
    /// Schema version tag
    #[serde(default = "legacy_version")]
    pub version: String,
    /// Quantity given to every root; 1 when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_quantity: Option<QuantityRepr>,
}

fn legacy_version() -> String {
    "1.0".to_string()
}

/// One entry of `edges`.
///
/// Current records are objects; the first schema stored bare
/// `[source, target]` pairs, which still load with a 1:1 ratio.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EdgeEntry {
    /// `{source, target, source_quantity, target_quantity}`
    Record(EdgeRecord),
    /// `[source, target]`
    Pair([String; 2]),
}

impl EdgeEntry {
    /// Normalize to an explicit record.
    pub fn into_record(self) -> EdgeRecord {
        match self {
            Self::Record(record) => record,
            Self::Pair([source, target]) => EdgeRecord::unit(source, target),
        }
    }
}

impl<'de> Deserialize<'de> for EdgeEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::Array(_) => serde_json::from_value(value)
                .map(Self::Pair)
                .map_err(|e| D::Error::custom(format!("edge pair must be [source, target]: {}", e))),
            Value::Object(_) => serde_json::from_value(value)
                .map(Self::Record)
                .map_err(|e| D::Error::custom(format!("edge record: {}", e))),
            other => Err(D::Error::custom(format!(
                "edge must be an object or a [source, target] pair, got {}",
                other
            ))),
        }
    }
}

/// How a root quantity appears in JSON: a plain number or a `"p/q"` string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuantityRepr {
    /// Whole number
    Integer(u64),
    /// Decimal number
    Float(f64),
    /// Exact fraction such as `"3/2"`
    Text(String),
}
