//! N-hop neighborhood around a selected bead.
//!
//! Relatedness ignores edge direction: a bead's blockers and dependents are
//! both one hop away. The neighborhood is used to dim everything the user is
//! not looking at, never to remove it.

use std::collections::HashSet;

use fixedbitset::FixedBitSet;
use tracing::{instrument, trace};

use crate::adjacency::AdjacencyIndex;

/// Ids reachable from `node_id` in at most `hops` undirected steps,
/// including `node_id` itself.
///
/// `hops == 0` and ids absent from `adjacency` both yield `{node_id}`.
/// The result only grows as `hops` increases.
#[must_use]
#[instrument(skip(adjacency), fields(indexed = adjacency.len()))]
pub fn n_hop_neighborhood(
    node_id: &str,
    hops: usize,
    adjacency: &AdjacencyIndex,
) -> HashSet<String> {
    let Some(start) = adjacency.slot(node_id) else {
        return HashSet::from([node_id.to_string()]);
    };

    let mut visited = FixedBitSet::with_capacity(adjacency.len());
    visited.insert(start);
    let mut frontier = vec![start];

    for hop in 0..hops {
        let mut next = Vec::new();
        for &slot in &frontier {
            for &neighbor in adjacency.neighbor_slots(slot) {
                if !visited.put(neighbor) {
                    next.push(neighbor);
                }
            }
        }
        if next.is_empty() {
            trace!(hop, "neighborhood saturated");
            break;
        }
        frontier = next;
    }

    visited
        .ones()
        .filter_map(|slot| adjacency.id(slot))
        .map(str::to_string)
        .collect()
}
