//! Single-pass propagation for graphs with cycles.

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::graph::NodeIndex;

use super::{into_named, Quantities};
use crate::graph::RatioGraph;
use crate::quantity::Quantity;

/// Breadth-first walk from the roots, assigning each node at most once.
///
/// When every node sits on or behind a cycle there are no roots; the first
/// node ever created is seeded instead so a pure cycle still gets values.
pub(super) fn propagate(graph: &RatioGraph, root_quantity: &Quantity) -> Quantities {
    let mut seeds: Vec<NodeIndex> = graph
        .roots()
        .iter()
        .filter_map(|name| graph.index_of(name))
        .collect();
    if seeds.is_empty() {
        seeds.extend(graph.inner().node_indices().next());
    }

    let mut quantities: HashMap<NodeIndex, Quantity> = HashMap::new();
    let mut visited: HashSet<NodeIndex> = HashSet::new();
    let mut queue: VecDeque<NodeIndex> = VecDeque::new();

    for seed in seeds {
        quantities.insert(seed, root_quantity.clone());
        visited.insert(seed);
        queue.push_back(seed);
    }

    while let Some(current) = queue.pop_front() {
        let Some(current_value) = quantities.get(&current).cloned() else {
            continue;
        };

        for (successor, ratio) in graph.outgoing_edges(current) {
            quantities
                .entry(successor)
                .or_insert_with(|| ratio.apply(&current_value));
            if visited.insert(successor) {
                queue.push_back(successor);
            }
        }
    }

    into_named(graph, quantities)
}
