//! Ratio graph structure.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::debug;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use super::types::{EdgeRatio, EdgeRecord, Node};
use super::CycleError;
use crate::chain::Chain;
use crate::error::{RatioGraphError, Result};
use crate::quantity::Quantity;

/// A directed graph of named nodes joined by ratio-labeled edges.
///
/// Wraps a petgraph `DiGraph` with a name lookup table. Nodes are created
/// implicitly by the first edge that mentions them and are only ever removed
/// all at once by [`RatioGraph::clear`]. There is at most one edge per
/// ordered (source, target) pair.
#[derive(Debug, Clone, Default)]
pub struct RatioGraph {
    /// The underlying directed graph
    graph: DiGraph<Node, EdgeRatio>,
    /// Lookup table: node name → petgraph NodeIndex
    node_indices: HashMap<String, NodeIndex>,
}

impl RatioGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Check if a node exists.
    pub fn contains_node(&self, name: &str) -> bool {
        self.node_indices.contains_key(name)
    }

    /// Get a node by name.
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.index_of(name).map(|idx| &self.graph[idx])
    }

    /// Ratio of the edge `source → target`, if present.
    pub fn edge(&self, source: &str, target: &str) -> Option<EdgeRatio> {
        let from = self.index_of(source)?;
        let to = self.index_of(target)?;
        self.graph.find_edge(from, to).map(|e| self.graph[e])
    }

    /// Insert the edge `source → target`, or overwrite its ratio if it exists.
    ///
    /// Missing endpoints are created.
    pub fn add_edge(&mut self, source: &str, target: &str, ratio: EdgeRatio) {
        let from = self.ensure_node(source);
        let to = self.ensure_node(target);
        self.graph.update_edge(from, to, ratio);
    }

    /// Insert every edge implied by a parsed chain.
    ///
    /// Returns the number of edges written (inserted or overwritten). The
    /// whole chain is validated first; on error the graph is unchanged.
    pub fn apply_chain(&mut self, chain: &Chain) -> Result<usize> {
        if chain.link_count() < 2 || chain.segments.len() < 2 {
            return Err(RatioGraphError::parse(
                chain.to_string(),
                "expected at least two nodes, e.g. a.b",
            ));
        }
        if chain.segments.iter().any(|segment| segment.links.is_empty()) {
            return Err(RatioGraphError::parse(chain.to_string(), "empty segment"));
        }
        if chain.links().any(|link| link.name.is_empty()) {
            return Err(RatioGraphError::parse(chain.to_string(), "empty node name"));
        }

        let edges = chain
            .edge_pairs()
            .into_iter()
            .map(|(source, target)| {
                EdgeRatio::new(source.multiplicity, target.multiplicity)
                    .map(|ratio| (source.name.as_str(), target.name.as_str(), ratio))
                    .ok_or_else(|| {
                        RatioGraphError::parse(chain.to_string(), "multiplicity must be at least 1")
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        for (source, target, ratio) in &edges {
            self.add_edge(source, target, *ratio);
        }
        debug!("applied chain '{}' ({} edges)", chain, edges.len());
        Ok(edges.len())
    }

    /// Names of all nodes with no incoming edges.
    pub fn roots(&self) -> BTreeSet<String> {
        self.graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|idx| self.graph[idx].name.clone())
            .collect()
    }

    /// Names of the direct predecessors of `name`, in edge insertion order.
    pub fn predecessors(&self, name: &str) -> Vec<&str> {
        self.neighbors(name, Direction::Incoming)
    }

    /// Names of the direct successors of `name`, in edge insertion order.
    pub fn successors(&self, name: &str) -> Vec<&str> {
        self.neighbors(name, Direction::Outgoing)
    }

    /// Order the nodes so that each appears after all of its predecessors.
    pub fn topological_order(&self) -> std::result::Result<Vec<String>, CycleError> {
        petgraph::algo::toposort(&self.graph, None)
            .map(|order| {
                order
                    .into_iter()
                    .map(|idx| self.graph[idx].name.clone())
                    .collect()
            })
            .map_err(|cycle| CycleError {
                node: self.graph[cycle.node_id()].name.clone(),
            })
    }

    /// Whether any directed cycle (including a self-loop) exists.
    pub fn has_cycle(&self) -> bool {
        petgraph::algo::is_cyclic_directed(&self.graph)
    }

    /// Remove every node and edge.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.node_indices.clear();
    }

    /// All nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    /// Node names in lexical order.
    pub fn sorted_node_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.node_indices.keys().cloned().collect();
        names.sort();
        names
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> Vec<EdgeRecord> {
        self.graph
            .edge_references()
            .map(|edge| EdgeRecord {
                source: self.graph[edge.source()].name.clone(),
                target: self.graph[edge.target()].name.clone(),
                source_quantity: edge.weight().source_quantity(),
                target_quantity: edge.weight().target_quantity(),
            })
            .collect()
    }

    /// All edges ordered by (source, target).
    pub fn sorted_edges(&self) -> Vec<EdgeRecord> {
        let mut edges = self.edges();
        edges.sort();
        edges
    }

    /// Store propagated quantities on the nodes for display.
    ///
    /// Nodes absent from `quantities` are reset to unquantified.
    pub fn set_cached_quantities(&mut self, quantities: &BTreeMap<String, Quantity>) {
        for node in self.graph.node_weights_mut() {
            node.quantity = quantities.get(&node.name).cloned();
        }
    }

    /// Borrow the underlying petgraph graph.
    pub(crate) fn inner(&self) -> &DiGraph<Node, EdgeRatio> {
        &self.graph
    }

    /// Get the petgraph index for a node name.
    pub(crate) fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.node_indices.get(name).copied()
    }

    /// Edges leaving `idx`, in insertion order.
    pub(crate) fn outgoing_edges(&self, idx: NodeIndex) -> Vec<(NodeIndex, EdgeRatio)> {
        self.adjacent_edges(idx, Direction::Outgoing)
    }

    /// Edges entering `idx`, in insertion order.
    pub(crate) fn incoming_edges(&self, idx: NodeIndex) -> Vec<(NodeIndex, EdgeRatio)> {
        self.adjacent_edges(idx, Direction::Incoming)
    }

    fn ensure_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(Node::new(name));
        self.node_indices.insert(name.to_string(), idx);
        idx
    }

    // petgraph walks adjacency lists newest-first; sort by edge index to
    // restore insertion order.
    fn adjacent_edges(&self, idx: NodeIndex, dir: Direction) -> Vec<(NodeIndex, EdgeRatio)> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(idx, dir)
            .map(|edge| {
                let other = match dir {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                (edge.id(), other, *edge.weight())
            })
            .collect();
        edges.sort_by_key(|(id, _, _)| *id);
        edges
            .into_iter()
            .map(|(_, other, ratio)| (other, ratio))
            .collect()
    }

    fn neighbors(&self, name: &str, dir: Direction) -> Vec<&str> {
        match self.index_of(name) {
            Some(idx) => self
                .adjacent_edges(idx, dir)
                .into_iter()
                .map(|(other, _)| self.graph[other].name.as_str())
                .collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain;

    fn graph_from(chains: &[&str]) -> RatioGraph {
        let mut graph = RatioGraph::new();
        for text in chains {
            graph.apply_chain(&chain::parse(text).unwrap()).unwrap();
        }
        graph
    }

    #[test]
    fn test_add_edge_creates_nodes() {
        let mut graph = RatioGraph::new();
        graph.add_edge("a", "b", EdgeRatio::UNIT);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.contains_node("a"));
        assert!(graph.node("b").unwrap().quantity.is_none());
    }

    #[test]
    fn test_add_edge_overwrites_ratio() {
        let mut graph = RatioGraph::new();
        graph.add_edge("a", "b", EdgeRatio::UNIT);
        graph.add_edge("a", "b", EdgeRatio::new(2, 5).unwrap());
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge("a", "b"), EdgeRatio::new(2, 5));
    }

    #[test]
    fn test_apply_chain_ratios() {
        let graph = graph_from(&["2a.3b"]);
        let ratio = graph.edge("a", "b").unwrap();
        assert_eq!(ratio.source_quantity(), 2);
        assert_eq!(ratio.target_quantity(), 3);
    }

    #[test]
    fn test_apply_chain_fan_out() {
        let graph = graph_from(&["a.b,c"]);
        assert_eq!(graph.edge("a", "b"), Some(EdgeRatio::UNIT));
        assert_eq!(graph.edge("a", "c"), Some(EdgeRatio::UNIT));
        assert_eq!(graph.successors("a"), vec!["b", "c"]);
    }

    #[test]
    fn test_apply_chain_rejects_short_chain() {
        let mut graph = RatioGraph::new();
        let chain = Chain {
            segments: vec![crate::chain::Segment {
                links: vec![crate::chain::ChainLink::new("a", 1)],
            }],
        };
        assert!(graph.apply_chain(&chain).unwrap_err().is_parse_error());
        assert!(graph.is_empty());
    }

    #[test]
    fn test_apply_chain_zero_multiplicity_leaves_graph_untouched() {
        let mut graph = RatioGraph::new();
        let chain = Chain {
            segments: vec![
                crate::chain::Segment {
                    links: vec![crate::chain::ChainLink::new("a", 1)],
                },
                crate::chain::Segment {
                    links: vec![crate::chain::ChainLink::new("b", 1)],
                },
                crate::chain::Segment {
                    links: vec![crate::chain::ChainLink::new("c", 0)],
                },
            ],
        };
        assert!(graph.apply_chain(&chain).unwrap_err().is_parse_error());
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_apply_chain_rejects_empty_segment() {
        let mut graph = RatioGraph::new();
        let chain = Chain {
            segments: vec![
                crate::chain::Segment {
                    links: vec![
                        crate::chain::ChainLink::new("a", 1),
                        crate::chain::ChainLink::new("b", 1),
                    ],
                },
                crate::chain::Segment { links: vec![] },
            ],
        };
        assert!(graph.apply_chain(&chain).unwrap_err().is_parse_error());
        assert!(graph.is_empty());
    }

    #[test]
    fn test_roots_and_neighbors() {
        let graph = graph_from(&["a.b.c", "d.c"]);
        let roots: Vec<_> = graph.roots().into_iter().collect();
        assert_eq!(roots, vec!["a", "d"]);
        assert_eq!(graph.predecessors("c"), vec!["b", "d"]);
        assert!(graph.successors("missing").is_empty());
    }

    #[test]
    fn test_topological_order() {
        let graph = graph_from(&["a.b.c", "a.c"]);
        let order = graph.topological_order().unwrap();
        let pos = |n: &str| order.iter().position(|x| x == n).unwrap();
        assert!(pos("a") < pos("b"));
        assert!(pos("b") < pos("c"));
        assert!(!graph.has_cycle());
    }

    #[test]
    fn test_topological_order_cycle() {
        let graph = graph_from(&["a.b", "b.a"]);
        let err = graph.topological_order().unwrap_err();
        assert!(err.node == "a" || err.node == "b");
        assert!(graph.has_cycle());
        assert!(graph.roots().is_empty());
    }

    #[test]
    fn test_self_loop_is_cycle() {
        let graph = graph_from(&["a.a"]);
        assert!(graph.topological_order().is_err());
    }

    #[test]
    fn test_sorted_views() {
        let graph = graph_from(&["c.b", "a.b"]);
        assert_eq!(graph.sorted_node_names(), vec!["a", "b", "c"]);
        let edges = graph.sorted_edges();
        assert_eq!(edges[0].source, "a");
        assert_eq!(edges[1].source, "c");
        assert_eq!(graph.edges()[0].source, "c");
    }

    #[test]
    fn test_clear() {
        let mut graph = graph_from(&["a.b"]);
        graph.clear();
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
        assert!(!graph.contains_node("a"));
    }
}
