//! # Ratiograph Core
//!
//! A quantity propagation engine for directed graphs whose edges carry
//! conversion ratios.
//!
//! This library provides:
//! - A small chain language for describing edges (`2a.3b`, `a.b,c`)
//! - A ratio graph with implicit node creation and edge overwrite
//! - Exact rational propagation of a root quantity through the graph, with a
//!   breadth-first fallback for graphs that contain cycles
//! - A JSON config record for saving and loading graphs
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`chain`] - Parser for chain expressions
//! - [`graph`] - Ratio graph representation
//! - [`propagation`] - Topological and breadth-first quantity propagation
//! - [`codec`] - Config record encoding and file I/O
//! - [`session`] - The engine API used by a UI
//! - [`quantity`] - Exact rational quantities
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! ratiograph --config gene_graph_config.txt --root-quantity 10 2a.3b b.c,d
//! ```
//!
//! ### Library
//!
//! ```
//! use ratiograph_core::Session;
//!
//! let mut session = Session::new();
//! session.apply_chain_text("2a.3b").unwrap();
//! session.set_root_quantity_text("10").unwrap();
//! let quantities = session.compute_quantities();
//! assert_eq!(ratiograph_core::quantity::format_quantity(&quantities["b"]), "15");
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmRatioGraph } from 'ratiograph_core';
//!
//! const graph = new WasmRatioGraph();
//! graph.apply_chain("2a.3b");
//! const quantities = JSON.parse(graph.compute_quantities());
//! ```
//!
//! ## Propagation Method
//!
//! Every node with no incoming edge is a root and receives the root quantity.
//! An edge with ratio `s:t` turns `x` units of its source into `x * t / s`
//! units of its target.
//!
//! 1. If the graph is acyclic, visit nodes in topological order and give each
//!    the sum of the contributions of its predecessors
//! 2. Otherwise, walk breadth-first from the roots and give each node the
//!    contribution of the first predecessor that reaches it

pub mod chain;
pub mod codec;
pub mod error;
pub mod graph;
pub mod propagation;
pub mod quantity;
pub mod session;

// Re-export main types for convenience
pub use error::{RatioGraphError, Result};
pub use graph::{EdgeRatio, EdgeRecord, RatioGraph};
pub use propagation::{propagate, Quantities};
pub use quantity::Quantity;
pub use session::{Session, SessionConfig};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmRatioGraph;

/// Default config file name used by auto-save
pub const DEFAULT_CONFIG_FILE: &str = "gene_graph_config.txt";

/// Schema version written to config records
pub const CONFIG_VERSION: &str = "2.0";
