//! Partitioning of the unleveled remainder into cycle groups.
//!
//! # Edge Direction
//!
//! The graph uses edge direction `prerequisite → dependent`. After Kahn
//! leveling stops, every unresolved node still has at least one unresolved
//! prerequisite, so walking prerequisites backwards always ends on a cycle.
//!
//! # Algorithm
//!
//! 1. Build the subgraph induced by the unresolved nodes.
//! 2. Run Tarjan's SCC over it. Every SCC with more than one member, or with
//!    a self-loop, seeds one group.
//! 3. Nodes that are not on a cycle themselves (they only depend on one) are
//!    attached to the first group that reaches them, using a multi-source
//!    BFS along dependent edges seeded in group order.
//!
//! Every remainder node lands in exactly one group. Groups are ordered by
//! their earliest input position and members are listed in input order.
//! The whole pass is `O(V + E)` over the remainder.

#![allow(clippy::module_name_repetitions)]

use std::collections::VecDeque;

use fixedbitset::FixedBitSet;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::{trace, warn};

/// Partition every node not set in `resolved` into cycle groups.
///
/// Returns an empty list when `resolved` covers the whole graph.
#[must_use]
pub fn partition_remainder<E>(
    graph: &DiGraph<String, E>,
    resolved: &FixedBitSet,
) -> Vec<Vec<String>> {
    let remaining: Vec<NodeIndex> = graph
        .node_indices()
        .filter(|idx| !resolved.contains(idx.index()))
        .collect();

    if remaining.is_empty() {
        return Vec::new();
    }

    // Induced subgraph. Weights are the original indices; local indices are
    // assigned in ascending original order, so local order is input order.
    let mut local: Vec<Option<NodeIndex>> = vec![None; graph.node_count()];
    let mut sub = DiGraph::<NodeIndex, ()>::with_capacity(remaining.len(), 0);
    for &orig in &remaining {
        local[orig.index()] = Some(sub.add_node(orig));
    }
    for &orig in &remaining {
        let Some(from) = local[orig.index()] else { continue };
        for edge in graph.edges(orig) {
            if let Some(to) = local[edge.target().index()] {
                sub.add_edge(from, to, ());
            }
        }
    }

    let mut groups: Vec<Vec<NodeIndex>> = tarjan_scc(&sub)
        .into_iter()
        .filter(|component| {
            component.len() > 1
                || component
                    .first()
                    .is_some_and(|&node| sub.contains_edge(node, node))
        })
        .collect();

    for group in &mut groups {
        group.sort_unstable();
    }
    groups.sort_unstable_by_key(|group| group.first().copied());

    trace!(
        remainder = remaining.len(),
        cyclic_groups = groups.len(),
        "partitioning unleveled remainder"
    );

    attach_downstream(&sub, &mut groups);
    for group in &mut groups {
        group.sort_unstable();
    }
    groups.sort_unstable_by_key(|group| group.first().copied());

    groups
        .into_iter()
        .map(|group| {
            group
                .into_iter()
                .filter_map(|local_idx| sub.node_weight(local_idx))
                .filter_map(|&orig| graph.node_weight(orig).cloned())
                .collect()
        })
        .collect()
}

/// Attach every remainder node that is not on a cycle to the group of the
/// nearest upstream cycle.
fn attach_downstream(sub: &DiGraph<NodeIndex, ()>, groups: &mut Vec<Vec<NodeIndex>>) {
    let mut owner: Vec<Option<usize>> = vec![None; sub.node_count()];
    let mut queue: VecDeque<NodeIndex> = VecDeque::new();

    for (group_idx, group) in groups.iter().enumerate() {
        for &member in group {
            owner[member.index()] = Some(group_idx);
            queue.push_back(member);
        }
    }

    let mut seen = FixedBitSet::with_capacity(sub.node_count());
    while let Some(current) = queue.pop_front() {
        if seen.put(current.index()) {
            continue;
        }
        let Some(group_idx) = owner[current.index()] else {
            continue;
        };
        for next in sub.neighbors(current) {
            if owner[next.index()].is_none() {
                owner[next.index()] = Some(group_idx);
                groups[group_idx].push(next);
                queue.push_back(next);
            }
        }
    }

    // Unreachable when the remainder came from Kahn leveling; kept so the
    // partition stays total for arbitrary `resolved` sets.
    for idx in sub.node_indices() {
        if owner[idx.index()].is_none() {
            warn!(node = idx.index(), "remainder node not downstream of any cycle");
            groups.push(vec![idx]);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn graph_with_nodes_and_edges(
        nodes: &[&str],
        edges: &[(&str, &str)],
    ) -> (DiGraph<String, ()>, HashMap<String, NodeIndex>) {
        let mut graph = DiGraph::<String, ()>::new();
        let mut map: HashMap<String, NodeIndex> = HashMap::new();

        for &node in nodes {
            let idx = graph.add_node(node.to_string());
            map.insert(node.to_string(), idx);
        }

        for &(from, to) in edges {
            graph.add_edge(map[from], map[to], ());
        }

        (graph, map)
    }

    fn unresolved(graph: &DiGraph<String, ()>) -> FixedBitSet {
        FixedBitSet::with_capacity(graph.node_count())
    }

    #[test]
    fn fully_resolved_graph_has_no_groups() {
        let (graph, _) = graph_with_nodes_and_edges(&["A", "B"], &[("A", "B")]);
        let mut resolved = unresolved(&graph);
        resolved.insert_range(..);
        assert!(partition_remainder(&graph, &resolved).is_empty());
    }

    #[test]
    fn self_loop_is_a_one_element_group() {
        let (graph, _) = graph_with_nodes_and_edges(&["A"], &[("A", "A")]);
        let groups = partition_remainder(&graph, &unresolved(&graph));
        assert_eq!(groups, vec![vec!["A".to_string()]]);
    }

    #[test]
    fn independent_cycles_are_split() {
        // A ⇄ B, C → D → E → C, F → F
        let (graph, _) = graph_with_nodes_and_edges(
            &["A", "B", "C", "D", "E", "F"],
            &[
                ("A", "B"),
                ("B", "A"),
                ("C", "D"),
                ("D", "E"),
                ("E", "C"),
                ("F", "F"),
            ],
        );
        let groups = partition_remainder(&graph, &unresolved(&graph));
        assert_eq!(
            groups,
            vec![
                vec!["A".to_string(), "B".to_string()],
                vec!["C".to_string(), "D".to_string(), "E".to_string()],
                vec!["F".to_string()],
            ]
        );
    }

    #[test]
    fn downstream_nodes_join_their_upstream_cycle() {
        // A ⇄ B → C → D, where C and D are only blocked by the cycle.
        let (graph, _) = graph_with_nodes_and_edges(
            &["D", "A", "C", "B"],
            &[("A", "B"), ("B", "A"), ("B", "C"), ("C", "D")],
        );
        let groups = partition_remainder(&graph, &unresolved(&graph));
        assert_eq!(groups.len(), 1);
        // Input order within the group.
        assert_eq!(groups[0], vec!["D", "A", "C", "B"]);
    }

    #[test]
    fn node_downstream_of_two_cycles_joins_exactly_one() {
        // A ⇄ B → X ← C ⇄ D
        let (graph, _) = graph_with_nodes_and_edges(
            &["A", "B", "C", "D", "X"],
            &[("A", "B"), ("B", "A"), ("C", "D"), ("D", "C"), ("B", "X"), ("D", "X")],
        );
        let groups = partition_remainder(&graph, &unresolved(&graph));
        assert_eq!(groups.len(), 2);
        let total: usize = groups.iter().map(Vec::len).sum();
        assert_eq!(total, 5, "X appears once");
        assert_eq!(groups[0], vec!["A", "B", "X"]);
        assert_eq!(groups[1], vec!["C", "D"]);
    }

    #[test]
    fn resolved_nodes_are_excluded() {
        // R → A ⇄ B with R already leveled.
        let (graph, map) =
            graph_with_nodes_and_edges(&["R", "A", "B"], &[("R", "A"), ("A", "B"), ("B", "A")]);
        let mut resolved = unresolved(&graph);
        resolved.insert(map["R"].index());
        let groups = partition_remainder(&graph, &resolved);
        assert_eq!(groups, vec![vec!["A".to_string(), "B".to_string()]]);
    }
}
