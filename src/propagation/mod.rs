//! Quantity propagation.
//!
//! Every root (a node with no incoming edges) receives the root quantity, and
//! each edge `p → n` with ratio `s:t` contributes `quantity(p) * t / s` to `n`.
//!
//! ## Modes
//!
//! - **Topological**: used whenever the graph is acyclic. Nodes are visited in
//!   topological order and a node's quantity is the sum of the contributions
//!   of all of its quantified predecessors.
//! - **Breadth-first**: used when the graph has a cycle. A single BFS pass
//!   from the roots assigns each node once, from the first predecessor that
//!   reaches it. Later edges into an already quantified node are ignored, so a
//!   cycle's back-edge never changes a value. This is an approximation, not a
//!   fixed-point solve.
//!
//! Both modes are pure functions of the graph and the root quantity.

mod breadth_first;
mod topological;

use std::collections::{BTreeMap, HashMap};

use log::debug;
use petgraph::graph::NodeIndex;

use crate::graph::RatioGraph;
use crate::quantity::Quantity;

/// Computed quantity per node name. Unreached nodes are absent.
pub type Quantities = BTreeMap<String, Quantity>;

/// Which traversal produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationMode {
    /// Exact summation in topological order
    Topological,
    /// Single-pass breadth-first fallback for cyclic graphs
    BreadthFirst,
}

/// Quantities together with the mode that computed them.
#[derive(Debug, Clone, PartialEq)]
pub struct Propagation {
    /// Computed quantities
    pub quantities: Quantities,
    /// Traversal mode used
    pub mode: PropagationMode,
}

/// Compute the quantity of every node reachable from the roots.
pub fn propagate(graph: &RatioGraph, root_quantity: &Quantity) -> Quantities {
    propagate_with_mode(graph, root_quantity).quantities
}

/// Like [`propagate`], also reporting which mode was used.
pub fn propagate_with_mode(graph: &RatioGraph, root_quantity: &Quantity) -> Propagation {
    match graph.topological_order() {
        Ok(order) => {
            debug!("propagating over {} nodes in topological order", order.len());
            Propagation {
                quantities: topological::propagate(graph, &order, root_quantity),
                mode: PropagationMode::Topological,
            }
        }
        Err(cycle) => {
            debug!("{}; falling back to breadth-first propagation", cycle);
            Propagation {
                quantities: breadth_first::propagate(graph, root_quantity),
                mode: PropagationMode::BreadthFirst,
            }
        }
    }
}

fn into_named(graph: &RatioGraph, quantities: HashMap<NodeIndex, Quantity>) -> Quantities {
    quantities
        .into_iter()
        .map(|(idx, value)| (graph.inner()[idx].name.clone(), value))
        .collect()
}
