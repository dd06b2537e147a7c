//! Aggregate counts and density for a dependency graph.
//!
//! - **node_count**: number of beads.
//! - **edge_count**: number of distinct `(from, to)` dependencies between two
//!   different known beads. Repeats and self-loops are not counted.
//! - **density**: ratio of actual edges to the maximum possible edges for a
//!   directed graph: `density = edge_count / (node_count * (node_count - 1))`.
//!   An empty or single-node graph has density 0.0. Density never exceeds 1.0.
//!
//! The export usually carries these numbers already; [`GraphStats::compute`]
//! is the fallback when it does not.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::{GraphEdge, GraphNode};

/// Summary counts for a dependency graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    /// `edge_count / (node_count * (node_count - 1))`, zero below two nodes.
    pub density: f64,
}

impl GraphStats {
    /// Stats from raw counts.
    #[must_use]
    pub fn from_counts(node_count: usize, edge_count: usize) -> Self {
        Self {
            node_count,
            edge_count,
            density: compute_density(node_count, edge_count),
        }
    }

    /// Stats from export nodes and edges.
    ///
    /// Edges with unknown endpoints, self-loops and repeated pairs are
    /// ignored, so the count fits the `n * (n - 1)` maximum.
    #[must_use]
    pub fn compute(nodes: &[GraphNode], edges: &[GraphEdge]) -> Self {
        let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        let pairs: HashSet<(&str, &str)> = edges
            .iter()
            .filter(|e| !e.is_self_loop())
            .filter(|e| ids.contains(e.from.as_str()) && ids.contains(e.to.as_str()))
            .map(|e| (e.from.as_str(), e.to.as_str()))
            .collect();
        Self::from_counts(ids.len(), pairs.len())
    }
}

#[allow(clippy::cast_precision_loss)]
fn compute_density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0_f64;
    }
    let max_edges = (node_count * (node_count - 1)) as f64;
    (edge_count as f64 / max_edges).min(1.0)
}
