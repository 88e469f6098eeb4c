//! Exact propagation over an acyclic graph.

use std::collections::HashMap;

use num_traits::Zero;

use super::{into_named, Quantities};
use crate::graph::RatioGraph;
use crate::quantity::{self, Quantity};

/// Visit `order` and sum each node's contributions from its predecessors.
pub(super) fn propagate(
    graph: &RatioGraph,
    order: &[String],
    root_quantity: &Quantity,
) -> Quantities {
    let roots = graph.roots();
    let mut quantities: HashMap<_, Quantity> = roots
        .iter()
        .filter_map(|name| graph.index_of(name))
        .map(|idx| (idx, root_quantity.clone()))
        .collect();

    for name in order {
        if roots.contains(name) {
            continue;
        }
        let Some(idx) = graph.index_of(name) else {
            continue;
        };

        let mut total = Quantity::zero();
        for (pred, ratio) in graph.incoming_edges(idx) {
            if let Some(value) = quantities.get(&pred) {
                total += ratio.apply(value);
            }
        }

        // Nodes with no quantified predecessor stay unassigned
        if quantity::is_positive(&total) {
            quantities.insert(idx, total);
        }
    }

    into_named(graph, quantities)
}
