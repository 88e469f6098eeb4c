//! Ratio graph representation.
//!
//! This module provides the in-memory graph that chains are written into and
//! that the propagator reads. Nodes carry an optional cached quantity; edges
//! carry an [`EdgeRatio`].

mod model;
mod types;

pub use model::RatioGraph;
pub use types::*;

use thiserror::Error;

/// Raised when a topological order is requested for a graph with a cycle.
///
/// The propagator uses this to switch to breadth-first propagation; it is
/// never surfaced to session callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("graph contains a cycle through node '{node}'")]
pub struct CycleError {
    /// A node that lies on the detected cycle
    pub node: String,
}
