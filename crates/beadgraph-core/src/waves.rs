//! Wave leveling for bead dependency graphs.
//!
//! Groups beads into "waves": sets of beads whose prerequisites were all
//! resolved in earlier waves, so every bead in a wave can proceed in
//! parallel.
//!
//! # Algorithm
//!
//! Kahn's algorithm, one BFS layer per wave:
//!
//! 1. Count unresolved prerequisites (in-degree) for every bead.
//! 2. Wave 0 is every bead with no prerequisites.
//! 3. Resolve the current wave, decrement the in-degree of each dependent,
//!    and collect those that reach zero as the next wave.
//! 4. Beads still unresolved when no wave can be formed are handed to
//!    [`partition_remainder`] and reported as cycle groups.
//!
//! Within a wave beads keep their input order. A self-loop counts as its
//! own prerequisite, so such a bead is never leveled and ends up in a cycle
//! group. Each node and edge is touched a constant number of times.

#![allow(clippy::module_name_repetitions)]

use fixedbitset::FixedBitSet;
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::graph::{BeadGraph, partition_remainder};
use crate::model::{GraphEdge, GraphNode};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A set of beads that can proceed in parallel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wave {
    /// Zero-indexed wave level.
    pub level: usize,
    /// Bead ids in input order.
    pub bead_ids: Vec<String>,
}

/// Result of wave computation.
///
/// Every input bead appears exactly once across `waves` and `cycles`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveResult {
    /// Waves in execution order (wave 0 first).
    pub waves: Vec<Wave>,
    /// Groups of bead ids that could not be leveled.
    pub cycles: Vec<Vec<String>>,
    /// Whether any cycles were detected.
    pub has_cycles: bool,
}

impl WaveResult {
    /// Result for a graph with no beads.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Level of `bead_id`, or `None` if it is in a cycle group or unknown.
    #[must_use]
    pub fn level_of(&self, bead_id: &str) -> Option<usize> {
        self.waves
            .iter()
            .find(|w| w.bead_ids.iter().any(|id| id == bead_id))
            .map(|w| w.level)
    }

    /// Number of leveled beads.
    #[must_use]
    pub fn leveled_count(&self) -> usize {
        self.waves.iter().map(|w| w.bead_ids.len()).sum()
    }

    /// Size of the widest wave (peak parallelism).
    #[must_use]
    pub fn max_width(&self) -> usize {
        self.waves.iter().map(|w| w.bead_ids.len()).max().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Compute waves using every edge with known endpoints.
#[must_use]
#[instrument(skip_all, fields(nodes = nodes.len(), edges = edges.len()))]
pub fn compute_waves(nodes: &[GraphNode], edges: &[GraphEdge]) -> WaveResult {
    level_graph(&BeadGraph::from_nodes(nodes, edges))
}

/// Compute waves using only workflow dependency kinds (`blocks`,
/// `parent-child`, `conditional-blocks`, `waits-for`).
///
/// Informational links such as `references` never delay a bead.
#[must_use]
#[instrument(skip_all, fields(nodes = nodes.len(), edges = edges.len()))]
pub fn compute_workflow_waves(nodes: &[GraphNode], edges: &[GraphEdge]) -> WaveResult {
    level_graph(&BeadGraph::workflow_only(nodes, edges))
}

/// Level an already-validated graph.
#[must_use]
pub fn level_graph(bead_graph: &BeadGraph) -> WaveResult {
    let graph = &bead_graph.graph;
    let node_count = graph.node_count();

    if node_count == 0 {
        return WaveResult::empty();
    }

    let mut in_degree: Vec<usize> = graph
        .node_indices()
        .map(|idx| graph.neighbors_directed(idx, Direction::Incoming).count())
        .collect();

    let mut resolved = FixedBitSet::with_capacity(node_count);
    let mut current: Vec<NodeIndex> = graph
        .node_indices()
        .filter(|idx| in_degree[idx.index()] == 0)
        .collect();
    let mut waves: Vec<Wave> = Vec::new();

    while !current.is_empty() {
        for idx in &current {
            resolved.insert(idx.index());
        }

        let mut next: Vec<NodeIndex> = Vec::new();
        for &idx in &current {
            for dependent in graph.neighbors_directed(idx, Direction::Outgoing) {
                if resolved.contains(dependent.index()) {
                    continue;
                }
                let remaining = &mut in_degree[dependent.index()];
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    next.push(dependent);
                }
            }
        }
        // Input order, not discovery order.
        next.sort_unstable();

        waves.push(Wave {
            level: waves.len(),
            bead_ids: current
                .iter()
                .filter_map(|&idx| bead_graph.bead_id(idx))
                .map(str::to_string)
                .collect(),
        });
        current = next;
    }

    let cycles = partition_remainder(graph, &resolved);

    debug!(
        waves = waves.len(),
        leveled = resolved.count_ones(..),
        cycle_groups = cycles.len(),
        "computed waves"
    );

    WaveResult {
        has_cycles: !cycles.is_empty(),
        waves,
        cycles,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(ids: &[&str]) -> Vec<GraphNode> {
        ids.iter().map(|id| GraphNode::new(*id, *id)).collect()
    }

    fn edges(pairs: &[(&str, &str)]) -> Vec<GraphEdge> {
        pairs.iter().map(|(a, b)| GraphEdge::new(*a, *b)).collect()
    }

    fn wave_ids(result: &WaveResult) -> Vec<Vec<&str>> {
        result
            .waves
            .iter()
            .map(|w| w.bead_ids.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn empty_input() {
        let result = compute_waves(&[], &[]);
        assert_eq!(result, WaveResult::empty());
        assert!(!result.has_cycles);
    }

    #[test]
    fn single_bead() {
        let result = compute_waves(&nodes(&["A"]), &[]);
        assert_eq!(result.waves.len(), 1);
        assert_eq!(result.waves[0].level, 0);
        assert_eq!(result.waves[0].bead_ids, vec!["A"]);
        assert!(!result.has_cycles);
    }

    #[test]
    fn linear_chain() {
        let result = compute_waves(&nodes(&["A", "B", "C"]), &edges(&[("A", "B"), ("B", "C")]));
        assert_eq!(wave_ids(&result), vec![vec!["A"], vec!["B"], vec!["C"]]);
        assert!(!result.has_cycles);
    }

    #[test]
    fn diamond_parallelism() {
        let result = compute_waves(
            &nodes(&["A", "B", "C", "D"]),
            &edges(&[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")]),
        );
        assert_eq!(wave_ids(&result), vec![vec!["A"], vec!["B", "C"], vec!["D"]]);
        assert_eq!(result.max_width(), 2);
    }

    #[test]
    fn wave_order_follows_input_not_ids() {
        let result = compute_waves(&nodes(&["C", "B", "A"]), &[]);
        assert_eq!(wave_ids(&result), vec![vec!["C", "B", "A"]]);
    }

    #[test]
    fn next_wave_keeps_input_order_regardless_of_discovery() {
        // Z is discovered first (via A) but comes later in the input.
        let result = compute_waves(
            &nodes(&["A", "B", "Y", "Z"]),
            &edges(&[("A", "Z"), ("B", "Y")]),
        );
        assert_eq!(wave_ids(&result), vec![vec!["A", "B"], vec!["Y", "Z"]]);
    }

    #[test]
    fn two_node_cycle() {
        let result = compute_waves(&nodes(&["A", "B"]), &edges(&[("A", "B"), ("B", "A")]));
        assert!(result.waves.is_empty());
        assert_eq!(result.cycles, vec![vec!["A".to_string(), "B".to_string()]]);
        assert!(result.has_cycles);
    }

    #[test]
    fn self_loop_is_its_own_cycle() {
        let result = compute_waves(&nodes(&["A", "B"]), &edges(&[("A", "A")]));
        assert_eq!(wave_ids(&result), vec![vec!["B"]]);
        assert_eq!(result.cycles, vec![vec!["A".to_string()]]);
    }

    #[test]
    fn mixed_cycle_with_valid_prefix() {
        // D is free; A → B → C → A is a cycle.
        let result = compute_waves(
            &nodes(&["A", "B", "C", "D"]),
            &edges(&[("A", "B"), ("B", "C"), ("C", "A")]),
        );
        assert_eq!(wave_ids(&result), vec![vec!["D"]]);
        assert_eq!(result.cycles.len(), 1);
        assert_eq!(result.cycles[0], vec!["A", "B", "C"]);
    }

    #[test]
    fn level_exceeds_every_prerequisite() {
        let result = compute_waves(
            &nodes(&["A", "B", "C", "D"]),
            &edges(&[("A", "D"), ("B", "C"), ("C", "D")]),
        );
        assert_eq!(result.level_of("A"), Some(0));
        assert_eq!(result.level_of("C"), Some(1));
        assert_eq!(result.level_of("D"), Some(2));
        assert_eq!(result.level_of("missing"), None);
    }

    #[test]
    fn duplicate_and_dangling_edges_are_ignored() {
        let result = compute_waves(
            &nodes(&["A", "B"]),
            &edges(&[("A", "B"), ("A", "B"), ("MISSING", "B")]),
        );
        assert_eq!(wave_ids(&result), vec![vec!["A"], vec!["B"]]);
    }

    #[test]
    fn workflow_waves_ignore_informational_links() {
        let input = vec![
            GraphEdge::new("A", "B"),
            GraphEdge::new("A", "C").with_kind("references"),
        ];
        let all = compute_waves(&nodes(&["A", "B", "C"]), &input);
        assert_eq!(wave_ids(&all), vec![vec!["A"], vec!["B", "C"]]);

        let workflow = compute_workflow_waves(&nodes(&["A", "B", "C"]), &input);
        assert_eq!(wave_ids(&workflow), vec![vec!["A", "C"], vec!["B"]]);
    }

    #[test]
    fn deterministic_across_runs() {
        let n = nodes(&["A", "B", "C", "D", "E"]);
        let e = edges(&[("A", "B"), ("B", "C"), ("C", "B"), ("D", "E")]);
        assert_eq!(compute_waves(&n, &e), compute_waves(&n, &e));
    }
}
