//! Session: the engine surface a UI talks to.
//!
//! A [`Session`] owns one graph, its root quantity and the persisted
//! metadata. It is single-owner and synchronous; hosts that share a session
//! across threads must put it behind a lock since
//! [`Session::compute_quantities`] updates the cached node quantities.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::chain;
use crate::codec::{self, Metadata};
use crate::error::{RatioGraphError, Result};
use crate::graph::{EdgeRecord, RatioGraph};
use crate::propagation::{self, Quantities};
use crate::quantity::{self, Quantity};
use crate::DEFAULT_CONFIG_FILE;

/// Configuration for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Persist the graph after every successful edit.
    pub auto_save: bool,
    /// Where auto-save writes.
    pub auto_save_path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auto_save: false,
            auto_save_path: PathBuf::from(DEFAULT_CONFIG_FILE),
        }
    }
}

impl SessionConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn auto-save on or off.
    pub fn with_auto_save(mut self, auto_save: bool) -> Self {
        self.auto_save = auto_save;
        self
    }

    /// Auto-save to `path` after every successful edit.
    pub fn with_auto_save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.auto_save = true;
        self.auto_save_path = path.into();
        self
    }
}

/// One line that failed during a bulk import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFailure {
    /// 1-indexed line number
    pub line: usize,
    /// Why the line was rejected
    pub message: String,
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Lines applied successfully
    pub applied: usize,
    /// Lines that were rejected
    pub failures: Vec<LineFailure>,
}

/// Node and edge counts, for status lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphSummary {
    /// Number of nodes
    pub nodes: usize,
    /// Number of edges
    pub edges: usize,
}

impl fmt::Display for GraphSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "nodes: {}, edges: {}", self.nodes, self.edges)
    }
}

/// An editable ratio graph with its root quantity and save metadata.
#[derive(Debug, Clone)]
pub struct Session {
    graph: RatioGraph,
    root_quantity: Quantity,
    metadata: Metadata,
    config: SessionConfig,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create an empty session with default configuration.
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    /// Create an empty session with custom configuration.
    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            graph: RatioGraph::new(),
            root_quantity: quantity::one(),
            metadata: Metadata::default(),
            config,
        }
    }

    /// The current graph.
    pub fn graph(&self) -> &RatioGraph {
        &self.graph
    }

    /// Metadata of the last save or load.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// The active configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Parse a chain expression and add its edges.
    ///
    /// On a parse error the graph is left untouched. Returns the number of
    /// edges written.
    pub fn apply_chain_text(&mut self, text: &str) -> Result<usize> {
        let count = self.apply_line(text)?;
        self.auto_save();
        Ok(count)
    }

    /// The quantity assigned to every root.
    pub fn root_quantity(&self) -> &Quantity {
        &self.root_quantity
    }

    /// Set the root quantity; it must be strictly positive.
    pub fn set_root_quantity(&mut self, value: Quantity) -> Result<()> {
        if !quantity::is_positive(&value) {
            return Err(RatioGraphError::InvalidRootQuantity {
                value: quantity::format_quantity(&value),
            });
        }
        self.root_quantity = value;
        Ok(())
    }

    /// Parse and set the root quantity (`10`, `3/2` or `2.5`).
    pub fn set_root_quantity_text(&mut self, text: &str) -> Result<()> {
        let value = quantity::parse_quantity(text).ok_or_else(|| {
            RatioGraphError::InvalidRootQuantity {
                value: text.to_string(),
            }
        })?;
        self.set_root_quantity(value)
    }

    /// Propagate the root quantity and cache the results on the nodes.
    pub fn compute_quantities(&mut self) -> Quantities {
        let quantities = propagation::propagate(&self.graph, &self.root_quantity);
        self.graph.set_cached_quantities(&quantities);
        quantities
    }

    /// Remove every node and edge. The root quantity and metadata are kept.
    pub fn clear(&mut self) {
        self.graph.clear();
        info!("graph cleared");
        self.auto_save();
    }

    /// Write the config record to `path`.
    ///
    /// Sets the creation time on the first save and the modification time on
    /// every save.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut metadata = self.metadata.clone();
        metadata.touch(codec::now());

        let text = codec::serialize(&self.graph, &self.root_quantity, &metadata)?;
        codec::write_file(path, &text)?;

        self.metadata = metadata;
        info!(
            "saved {} edges to {}",
            self.graph.edge_count(),
            path.display()
        );
        Ok(())
    }

    /// Replace the whole session state with the record at `path`.
    ///
    /// Nothing changes if reading or decoding fails.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let snapshot = codec::read_file(path)?;

        self.graph = snapshot.graph;
        self.root_quantity = snapshot.root_quantity;
        self.metadata = snapshot.metadata;
        self.metadata.last_modified = Some(codec::now());
        info!(
            "loaded {} nodes and {} edges from {}",
            self.graph.node_count(),
            self.graph.edge_count(),
            path.display()
        );
        Ok(())
    }

    /// Encode the current state without touching the timestamps.
    pub fn to_config_string(&self) -> Result<String> {
        codec::serialize(&self.graph, &self.root_quantity, &self.metadata)
    }

    /// Replace the whole session state with an encoded config record.
    pub fn load_config_str(&mut self, text: &str) -> Result<()> {
        let snapshot = codec::deserialize(text)?;
        self.graph = snapshot.graph;
        self.root_quantity = snapshot.root_quantity;
        self.metadata = snapshot.metadata;
        Ok(())
    }

    /// Every edge, ordered by (source, target), for list rendering.
    pub fn export_edge_list(&self) -> Vec<EdgeRecord> {
        self.graph.sorted_edges()
    }

    /// Every node name in lexical order.
    pub fn node_names(&self) -> Vec<String> {
        self.graph.sorted_node_names()
    }

    /// Node and edge counts.
    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            nodes: self.graph.node_count(),
            edges: self.graph.edge_count(),
        }
    }

    /// Apply one chain per line.
    ///
    /// Blank lines and lines starting with `#` are skipped. A bad line is
    /// logged and reported, and the remaining lines are still applied.
    /// Auto-save runs once at the end, not per line.
    pub fn import_str(&mut self, text: &str) -> ImportReport {
        let mut report = ImportReport::default();

        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match self.apply_line(line) {
                Ok(_) => report.applied += 1,
                Err(e) => {
                    warn!("import line {}: {}", index + 1, e);
                    report.failures.push(LineFailure {
                        line: index + 1,
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            "imported {} chains ({} rejected)",
            report.applied,
            report.failures.len()
        );
        if report.applied > 0 {
            self.auto_save();
        }
        report
    }

    /// Read a file and apply one chain per line.
    pub fn import_file(&mut self, path: impl AsRef<Path>) -> Result<ImportReport> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| RatioGraphError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(self.import_str(&content))
    }

    fn apply_line(&mut self, text: &str) -> Result<usize> {
        let chain = chain::parse(text)?;
        self.graph.apply_chain(&chain)
    }

    // Auto-save failures are logged, never returned: the edit itself succeeded.
    fn auto_save(&mut self) {
        if !self.config.auto_save {
            return;
        }
        let path = self.config.auto_save_path.clone();
        if let Err(e) = self.save(&path) {
            warn!("auto-save failed: {}", e);
        }
    }
}
