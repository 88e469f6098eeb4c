//! Config record persistence.
//!
//! The graph, its root quantity, and some bookkeeping timestamps are stored
//! as a pretty-printed JSON document:
//!
//! ```text
//! {
//!   "edges": [
//!     { "source": "a", "target": "b", "source_quantity": 2, "target_quantity": 3 }
//!   ],
//!   "created_time": "2024-05-01 09:30:00",
//!   "last_modified": "2024-05-02 17:05:12",
//!   "node_count": 2,
//!   "version": "2.0",
//!   "root_quantity": 10
//! }
//! ```
//!
//! Records from the first schema (`"version": "1.0"`, edges as bare
//! `["a", "b"]` pairs, no `root_quantity`) load with 1:1 ratios and a root
//! quantity of 1.

mod record;

pub use record::{ConfigRecord, EdgeEntry, QuantityRepr};

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime, Timelike};

use crate::error::{RatioGraphError, Result};
use crate::graph::RatioGraph;
use crate::quantity::{self, Quantity};
use crate::CONFIG_VERSION;

/// Timestamp format used by `created_time` and `last_modified`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Bookkeeping fields carried alongside the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    /// Set on the first save and preserved afterwards
    pub created_time: Option<NaiveDateTime>,
    /// Updated on every save
    pub last_modified: Option<NaiveDateTime>,
    /// Schema version tag of the loaded or to-be-written record
    pub version: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            created_time: None,
            last_modified: None,
            version: CONFIG_VERSION.to_string(),
        }
    }
}

impl Metadata {
    /// Record a save at `now`; the creation time is only set once.
    pub fn touch(&mut self, now: NaiveDateTime) {
        self.last_modified = Some(now);
        self.created_time.get_or_insert(now);
        self.version = CONFIG_VERSION.to_string();
    }
}

/// Current local time truncated to whole seconds.
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Everything a config record restores.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Rebuilt graph
    pub graph: RatioGraph,
    /// Root quantity
    pub root_quantity: Quantity,
    /// Timestamps and version
    pub metadata: Metadata,
}

/// Encode a graph as a config record.
pub fn serialize(graph: &RatioGraph, root_quantity: &Quantity, metadata: &Metadata) -> Result<String> {
    let record = ConfigRecord {
        edges: graph.edges().into_iter().map(EdgeEntry::Record).collect(),
        created_time: format_timestamp(metadata.created_time),
        last_modified: format_timestamp(metadata.last_modified),
        node_count: graph.node_count(),
        version: metadata.version.clone(),
        root_quantity: Some(quantity_to_repr(root_quantity)),
    };
    Ok(serde_json::to_string_pretty(&record)?)
}

/// Decode a config record.
///
/// Fails with [`RatioGraphError::CodecError`] on malformed JSON, missing edge
/// fields, zero multiplicities, empty node names, unparsable timestamps, or a
/// non-positive root quantity.
pub fn deserialize(text: &str) -> Result<Snapshot> {
    let record: ConfigRecord = serde_json::from_str(text)?;

    let mut graph = RatioGraph::new();
    for (index, entry) in record.edges.into_iter().enumerate() {
        let edge = entry.into_record();
        if edge.source.is_empty() || edge.target.is_empty() {
            return Err(RatioGraphError::codec(format!(
                "edge {} has an empty node name",
                index
            )));
        }
        let ratio = edge.ratio().ok_or_else(|| {
            RatioGraphError::codec(format!(
                "edge {} ({} → {}) has a zero quantity",
                index, edge.source, edge.target
            ))
        })?;
        graph.add_edge(&edge.source, &edge.target, ratio);
    }

    let root_quantity = match record.root_quantity {
        Some(repr) => quantity_from_repr(&repr)?,
        None => quantity::one(),
    };

    let metadata = Metadata {
        created_time: parse_timestamp("created_time", &record.created_time)?,
        last_modified: parse_timestamp("last_modified", &record.last_modified)?,
        version: record.version,
    };

    Ok(Snapshot {
        graph,
        root_quantity,
        metadata,
    })
}

/// Read and decode a config file.
pub fn read_file(path: &Path) -> Result<Snapshot> {
    let content = fs::read_to_string(path).map_err(|e| RatioGraphError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    deserialize(&content)
}

/// Write `content` to `path` via a sibling temporary file.
///
/// A failed write leaves any previous file at `path` untouched.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    let tmp = temp_path(path);
    let write_error = |target: &Path, source: std::io::Error| RatioGraphError::FileWriteError {
        path: target.display().to_string(),
        source,
    };

    fs::write(&tmp, content).map_err(|e| write_error(&tmp, e))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(write_error(path, e));
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "config".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}

fn format_timestamp(time: Option<NaiveDateTime>) -> String {
    time.map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

fn parse_timestamp(field: &str, text: &str) -> Result<Option<NaiveDateTime>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    NaiveDateTime::parse_from_str(text.trim(), TIMESTAMP_FORMAT)
        .map(Some)
        .map_err(|e| RatioGraphError::codec(format!("invalid {} '{}': {}", field, text, e)))
}

fn quantity_to_repr(value: &Quantity) -> QuantityRepr {
    if value.is_integer() {
        if let Ok(whole) = u64::try_from(value.to_integer()) {
            return QuantityRepr::Integer(whole);
        }
    }
    QuantityRepr::Text(quantity::format_quantity(value))
}

fn quantity_from_repr(repr: &QuantityRepr) -> Result<Quantity> {
    let (value, shown) = match repr {
        QuantityRepr::Integer(n) => (Some(quantity::from_integer(*n)), n.to_string()),
        QuantityRepr::Float(f) => (quantity::from_f64(*f), f.to_string()),
        QuantityRepr::Text(s) => (quantity::parse_quantity(s), s.clone()),
    };
    match value {
        Some(v) if quantity::is_positive(&v) => Ok(v),
        _ => Err(RatioGraphError::codec(format!(
            "root_quantity '{}' is not a positive number",
            shown
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain;
    use crate::graph::EdgeRatio;

    fn sample_graph() -> RatioGraph {
        let mut graph = RatioGraph::new();
        for text in ["2a.3b.c,d", "基因.b"] {
            graph.apply_chain(&chain::parse(text).unwrap()).unwrap();
        }
        graph
    }

    fn timestamp(text: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let graph = sample_graph();
        let root = quantity::parse_quantity("7/3").unwrap();
        let mut metadata = Metadata::default();
        metadata.touch(timestamp("2024-05-01 09:30:00"));

        let text = serialize(&graph, &root, &metadata).unwrap();
        let snapshot = deserialize(&text).unwrap();

        assert_eq!(snapshot.graph.sorted_edges(), graph.sorted_edges());
        assert_eq!(snapshot.root_quantity, root);
        assert_eq!(snapshot.metadata, metadata);
    }

    #[test]
    fn test_serialized_fields() {
        let graph = sample_graph();
        let text = serialize(&graph, &quantity::from_integer(10), &Metadata::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["node_count"], 5);
        assert_eq!(value["version"], CONFIG_VERSION);
        assert_eq!(value["root_quantity"], 10);
        assert_eq!(value["created_time"], "");
        assert_eq!(value["edges"][0]["source"], "a");
        assert_eq!(value["edges"][0]["source_quantity"], 2);
        assert_eq!(value["edges"][0]["target_quantity"], 3);
        // Non-ASCII names are written as-is
        assert!(text.contains("基因"));
    }

    #[test]
    fn test_legacy_record() {
        let text = r#"{
            "edges": [["a", "b"], ["b", "c"]],
            "created_time": "2023-01-02 03:04:05",
            "last_modified": "2023-01-02 03:04:05",
            "node_count": 3,
            "version": "1.0"
        }"#;
        let snapshot = deserialize(text).unwrap();
        assert_eq!(snapshot.graph.edge("a", "b"), Some(EdgeRatio::UNIT));
        assert_eq!(snapshot.graph.edge("b", "c"), Some(EdgeRatio::UNIT));
        assert_eq!(snapshot.root_quantity, quantity::one());
        assert_eq!(snapshot.metadata.version, "1.0");
        assert_eq!(
            snapshot.metadata.created_time,
            Some(timestamp("2023-01-02 03:04:05"))
        );
    }

    #[test]
    fn test_fractional_and_float_root_quantity() {
        let text = r#"{"edges": [], "root_quantity": "3/2"}"#;
        assert_eq!(
            deserialize(text).unwrap().root_quantity,
            quantity::parse_quantity("3/2").unwrap()
        );
        let text = r#"{"edges": [], "root_quantity": 2.5}"#;
        assert_eq!(
            deserialize(text).unwrap().root_quantity,
            quantity::parse_quantity("5/2").unwrap()
        );
    }

    #[test]
    fn test_record_without_edges_loads_empty_graph() {
        let snapshot = deserialize(r#"{"created_time": ""}"#).unwrap();
        assert!(snapshot.graph.is_empty());
        assert_eq!(snapshot.root_quantity, quantity::one());
        assert_eq!(snapshot.metadata.created_time, None);
    }

    #[test]
    fn test_malformed_records() {
        let cases = [
            "not json",
            r#"{"edges": [{"source": "a"}]}"#,
            r#"{"edges": [{"source": "a", "target": "b", "source_quantity": 0}]}"#,
            r#"{"edges": [["", "b"]]}"#,
            r#"{"edges": [], "root_quantity": -1}"#,
            r#"{"edges": [], "root_quantity": "zero"}"#,
            r#"{"edges": [], "created_time": "yesterday"}"#,
        ];
        for text in cases {
            let err = deserialize(text).unwrap_err();
            assert!(
                matches!(err, RatioGraphError::CodecError { .. }),
                "expected codec error for {}: {:?}",
                text,
                err
            );
        }
    }

    #[test]
    fn test_touch_preserves_created_time() {
        let mut metadata = Metadata::default();
        metadata.touch(timestamp("2024-01-01 00:00:00"));
        metadata.touch(timestamp("2024-02-01 00:00:00"));
        assert_eq!(metadata.created_time, Some(timestamp("2024-01-01 00:00:00")));
        assert_eq!(metadata.last_modified, Some(timestamp("2024-02-01 00:00:00")));
    }

    #[test]
    fn test_write_and_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.txt");
        let graph = sample_graph();
        let text = serialize(&graph, &quantity::one(), &Metadata::default()).unwrap();

        write_file(&path, &text).unwrap();
        assert!(!temp_path(&path).exists());
        let snapshot = read_file(&path).unwrap();
        assert_eq!(snapshot.graph.edge_count(), graph.edge_count());
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_file(&dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, RatioGraphError::FileReadError { .. }));
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("graph.txt");
        let err = write_file(&path, "{}").unwrap_err();
        assert!(matches!(err, RatioGraphError::FileWriteError { .. }));
    }
}
