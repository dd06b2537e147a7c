//! Neighbor indexes over dependency edges.
//!
//! - [`AdjacencyIndex`]: undirected, arena-indexed adjacency used for
//!   "relatedness" queries such as N-hop focus. Dependencies are asymmetric
//!   for ordering but symmetric for relatedness, so every edge is recorded
//!   in both directions.
//! - [`DependencyIndex`]: directed view answering "what blocks this bead?"
//!   and "what does this bead unblock?" for list-style presentations.
//!
//! Ids are interned to dense `usize` slots in first-seen order; neighbor
//! lists hold slots, not strings.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use crate::graph::retain_known_edges;
use crate::model::{GraphEdge, GraphNode};

// ---------------------------------------------------------------------------
// AdjacencyIndex
// ---------------------------------------------------------------------------

/// Undirected adjacency built from directed edges.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyIndex {
    ids: Vec<String>,
    slots: HashMap<String, usize>,
    neighbors: Vec<Vec<usize>>,
}

impl AdjacencyIndex {
    /// Build from edges alone. Nodes with no edges are not indexed.
    ///
    /// Self-loops add no neighbor; repeated pairs are recorded once.
    #[must_use]
    pub fn from_edges(edges: &[GraphEdge]) -> Self {
        let mut index = Self::default();
        for edge in edges {
            let from = index.intern(&edge.from);
            let to = index.intern(&edge.to);
            if from != to {
                index.neighbors[from].push(to);
                index.neighbors[to].push(from);
            }
        }
        for list in &mut index.neighbors {
            list.sort_unstable();
            list.dedup();
        }
        index
    }

    /// Build from nodes and edges, dropping edges with unknown endpoints.
    ///
    /// Every node is indexed, including isolated ones.
    #[must_use]
    pub fn from_graph(nodes: &[GraphNode], edges: &[GraphEdge]) -> Self {
        let kept = retain_known_edges(nodes.iter().map(|n| n.id.as_str()), edges);
        let mut index = Self::from_edges(&kept);
        for node in nodes {
            index.intern(&node.id);
        }
        index
    }

    fn intern(&mut self, id: &str) -> usize {
        if let Some(&slot) = self.slots.get(id) {
            return slot;
        }
        let slot = self.ids.len();
        self.ids.push(id.to_string());
        self.slots.insert(id.to_string(), slot);
        self.neighbors.push(Vec::new());
        slot
    }

    /// Number of indexed ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.slots.contains_key(id)
    }

    /// Dense slot for `id`.
    #[must_use]
    pub fn slot(&self, id: &str) -> Option<usize> {
        self.slots.get(id).copied()
    }

    /// Id stored in `slot`.
    #[must_use]
    pub fn id(&self, slot: usize) -> Option<&str> {
        self.ids.get(slot).map(String::as_str)
    }

    /// Neighbor slots of `slot`; empty for an out-of-range slot.
    #[must_use]
    pub fn neighbor_slots(&self, slot: usize) -> &[usize] {
        self.neighbors.get(slot).map_or(&[][..], Vec::as_slice)
    }

    /// Direct neighbors of `id`, in first-seen order of their ids.
    pub fn neighbors(&self, id: &str) -> impl Iterator<Item = &str> + '_ {
        self.slot(id)
            .map(|slot| self.neighbor_slots(slot))
            .unwrap_or_default()
            .iter()
            .filter_map(|&n| self.id(n))
    }

    /// Number of distinct neighbors of `id`.
    #[must_use]
    pub fn degree(&self, id: &str) -> usize {
        self.slot(id).map_or(0, |slot| self.neighbor_slots(slot).len())
    }
}

// ---------------------------------------------------------------------------
// DependencyIndex
// ---------------------------------------------------------------------------

/// Directed blockers/dependents lists per bead.
#[derive(Debug, Clone, Default)]
pub struct DependencyIndex {
    blockers: HashMap<String, Vec<String>>,
    dependents: HashMap<String, Vec<String>>,
}

impl DependencyIndex {
    /// Build from nodes and edges, dropping edges with unknown endpoints.
    ///
    /// Lists keep edge order; a repeated edge is listed once.
    #[must_use]
    pub fn from_graph(nodes: &[GraphNode], edges: &[GraphEdge]) -> Self {
        let mut index = Self::default();
        for node in nodes {
            index.blockers.entry(node.id.clone()).or_default();
            index.dependents.entry(node.id.clone()).or_default();
        }

        for edge in retain_known_edges(nodes.iter().map(|n| n.id.as_str()), edges) {
            let blocked_by = index.blockers.entry(edge.to.clone()).or_default();
            if !blocked_by.contains(&edge.from) {
                blocked_by.push(edge.from.clone());
            }
            let unblocks = index.dependents.entry(edge.from).or_default();
            if !unblocks.contains(&edge.to) {
                unblocks.push(edge.to);
            }
        }
        index
    }

    /// Beads that must resolve before `id`.
    #[must_use]
    pub fn blockers(&self, id: &str) -> &[String] {
        self.blockers.get(id).map_or(&[][..], Vec::as_slice)
    }

    /// Beads waiting on `id`.
    #[must_use]
    pub fn dependents(&self, id: &str) -> &[String] {
        self.dependents.get(id).map_or(&[][..], Vec::as_slice)
    }

    /// `true` if `id` has no unresolved blockers in this graph.
    #[must_use]
    pub fn is_root(&self, id: &str) -> bool {
        self.blockers(id).is_empty()
    }
}
