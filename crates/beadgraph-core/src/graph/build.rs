//! Graph construction from export nodes and edges.
//!
//! # Edge Direction
//!
//! An edge `A → B` in the graph means "A is a prerequisite of B": A must be
//! resolved before B can proceed. Export edges are inserted as-is.
//!
//! # Validation
//!
//! - Edges whose `from` or `to` is not a known node id are dropped.
//! - Repeated `(from, to)` pairs collapse into one graph edge; the first
//!   edge's kind is kept.
//! - Repeated node ids keep their first occurrence.
//!
//! None of these are errors. They are counted on [`BeadGraph`] and logged at
//! `debug`.
//!
//! # Ordering
//!
//! Nodes are added in input order, so `NodeIndex` order is input order.
//! Passes that must be stable with respect to input simply sort by index.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, instrument};

use crate::model::{DependencyKind, GraphEdge, GraphNode};

// ---------------------------------------------------------------------------
// BeadGraph
// ---------------------------------------------------------------------------

/// A validated directed dependency graph.
///
/// Nodes are bead ids. An edge `A → B` means "A is a prerequisite of B".
#[derive(Debug, Clone)]
pub struct BeadGraph {
    /// Directed graph: nodes = bead ids, edges = dependency kinds.
    pub graph: DiGraph<String, DependencyKind>,
    /// Mapping from bead id to petgraph `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
    /// Edges dropped because an endpoint was unknown.
    pub dropped_edges: usize,
    /// Edges collapsed because the same `(from, to)` pair was already present.
    pub duplicate_edges: usize,
    content_hash: String,
}

impl BeadGraph {
    /// Build from export nodes, keeping every edge with known endpoints.
    #[must_use]
    pub fn from_nodes(nodes: &[GraphNode], edges: &[GraphEdge]) -> Self {
        Self::build(nodes.iter().map(|n| n.id.as_str()), edges, |_| true)
    }

    /// Build from export nodes, keeping only workflow dependency kinds.
    #[must_use]
    pub fn workflow_only(nodes: &[GraphNode], edges: &[GraphEdge]) -> Self {
        Self::build(nodes.iter().map(|n| n.id.as_str()), edges, |e| {
            e.kind.is_workflow()
        })
    }

    /// Build from an ordered id sequence and an edge filter.
    ///
    /// `keep` runs before endpoint validation; edges it rejects are neither
    /// counted as dropped nor hashed.
    #[must_use]
    #[instrument(skip_all)]
    pub fn build<'a, I, F>(ids: I, edges: &[GraphEdge], keep: F) -> Self
    where
        I: IntoIterator<Item = &'a str>,
        F: Fn(&GraphEdge) -> bool,
    {
        let mut graph = DiGraph::<String, DependencyKind>::new();
        let mut node_map: HashMap<String, NodeIndex> = HashMap::new();
        let mut hasher = blake3::Hasher::new();

        for id in ids {
            if node_map.contains_key(id) {
                continue;
            }
            hasher.update(id.as_bytes());
            hasher.update(b"\x00");
            let idx = graph.add_node(id.to_string());
            node_map.insert(id.to_string(), idx);
        }
        hasher.update(b"\x01");

        let mut dropped_edges = 0;
        let mut duplicate_edges = 0;

        for edge in edges.iter().filter(|e| keep(e)) {
            let (Some(&from), Some(&to)) = (node_map.get(&edge.from), node_map.get(&edge.to))
            else {
                dropped_edges += 1;
                debug!(from = %edge.from, to = %edge.to, "dropping edge with unknown endpoint");
                continue;
            };

            // petgraph allows parallel edges; leveling counts each one.
            if graph.contains_edge(from, to) {
                duplicate_edges += 1;
                continue;
            }

            hasher.update(edge.from.as_bytes());
            hasher.update(b"\x00");
            hasher.update(edge.to.as_bytes());
            hasher.update(b"\x00");
            graph.add_edge(from, to, edge.kind.clone());
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            dropped_edges,
            duplicate_edges,
            "built bead graph"
        );

        Self {
            graph,
            node_map,
            dropped_edges,
            duplicate_edges,
            content_hash: format!("blake3:{}", hasher.finalize()),
        }
    }

    /// Return the number of nodes (beads) in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of distinct dependency edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up the `NodeIndex` for a bead id.
    #[must_use]
    pub fn node_index(&self, bead_id: &str) -> Option<NodeIndex> {
        self.node_map.get(bead_id).copied()
    }

    /// Return the bead id label for a node.
    #[must_use]
    pub fn bead_id(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(String::as_str)
    }

    /// BLAKE3 hash of node ids and kept edges, `blake3:<hex>`.
    #[must_use]
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }
}

// ---------------------------------------------------------------------------
// Edge validation without a graph
// ---------------------------------------------------------------------------

/// Keep only edges whose endpoints are both in `ids`, preserving order.
///
/// Unlike [`BeadGraph::build`] this keeps duplicate edges; it is the
/// validation step for passes that hand edges straight to a renderer.
#[must_use]
pub fn retain_known_edges<'a, I>(ids: I, edges: &[GraphEdge]) -> Vec<GraphEdge>
where
    I: IntoIterator<Item = &'a str>,
{
    let known: HashSet<&str> = ids.into_iter().collect();
    let kept: Vec<GraphEdge> = edges
        .iter()
        .filter(|e| known.contains(e.from.as_str()) && known.contains(e.to.as_str()))
        .cloned()
        .collect();

    if kept.len() < edges.len() {
        debug!(
            dropped = edges.len() - kept.len(),
            "dropped edges with unknown endpoints"
        );
    }
    kept
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
