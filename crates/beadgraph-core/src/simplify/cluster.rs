//! Epic clustering: collapse an epic and its children into one node.
//!
//! # Identification
//!
//! A bead is an epic candidate when its type is `epic` or it carries an
//! `epic` or `parent` label. Its children are the beads with an edge
//! pointing *into* it (`edge.to == epic`): in beads a child "needs" its
//! parent. A candidate with no children stays an ordinary bead.
//!
//! # Remapping
//!
//! The epic and its children are replaced, at the epic's position in the
//! node list, by a synthetic [`ClusterNode`] with id `cluster-<epic>`.
//! Every edge endpoint naming a member is rewritten to the cluster id:
//!
//! - member → member of the same cluster: dropped (a rendering artifact).
//! - member → member of another cluster: cluster → cluster.
//! - outside bead → member: bead → cluster (and vice versa).
//!
//! Duplicate edges produced by remapping are kept; the renderer may bundle
//! them.
//!
//! # Overlap
//!
//! Candidates are processed in input order. A bead absorbed by an earlier
//! cluster cannot be claimed again, and a candidate that was itself absorbed
//! is not clustered. Cluster nodes are never absorbed, so clustering an
//! already-clustered view is the identity unless a remaining epic still has
//! bead children.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::model::{GraphEdge, GraphNode};

/// Id prefix of synthetic cluster nodes.
pub const CLUSTER_PREFIX: &str = "cluster-";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A collapsed epic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterNode {
    /// `cluster-<epic_id>`.
    pub id: String,
    pub epic_id: String,
    /// Title of the epic.
    pub title: String,
    pub child_count: usize,
    /// Absorbed children in first-seen edge order.
    pub child_ids: Vec<String>,
}

impl ClusterNode {
    fn new(epic: &GraphNode, child_ids: Vec<String>) -> Self {
        Self {
            id: format!("{CLUSTER_PREFIX}{}", epic.id),
            epic_id: epic.id.clone(),
            title: epic.title.clone(),
            child_count: child_ids.len(),
            child_ids,
        }
    }

    /// `true` if `id` is the epic or one of the absorbed children.
    #[must_use]
    pub fn absorbs(&self, id: &str) -> bool {
        self.epic_id == id || self.child_ids.iter().any(|c| c == id)
    }
}

/// A node in a simplified view: an ordinary bead or a collapsed epic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NodeKind {
    Bead(GraphNode),
    Cluster(ClusterNode),
}

impl NodeKind {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Bead(node) => &node.id,
            Self::Cluster(cluster) => &cluster.id,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Bead(node) => &node.title,
            Self::Cluster(cluster) => &cluster.title,
        }
    }

    #[must_use]
    pub const fn is_cluster(&self) -> bool {
        matches!(self, Self::Cluster(_))
    }

    #[must_use]
    pub const fn as_bead(&self) -> Option<&GraphNode> {
        match self {
            Self::Bead(node) => Some(node),
            Self::Cluster(_) => None,
        }
    }

    #[must_use]
    pub const fn as_cluster(&self) -> Option<&ClusterNode> {
        match self {
            Self::Cluster(cluster) => Some(cluster),
            Self::Bead(_) => None,
        }
    }
}

impl From<GraphNode> for NodeKind {
    fn from(node: GraphNode) -> Self {
        Self::Bead(node)
    }
}

/// Output of clustering: the simplified node list, remapped edges, and the
/// member → cluster mapping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClusteredGraph {
    pub nodes: Vec<NodeKind>,
    pub edges: Vec<GraphEdge>,
    membership: HashMap<String, String>,
}

impl ClusteredGraph {
    /// A view with no clusters: nodes deduplicated by id, edges with unknown
    /// endpoints dropped.
    #[must_use]
    pub fn unclustered(nodes: &[NodeKind], edges: &[GraphEdge]) -> Self {
        cluster_with(nodes, edges, false)
    }

    /// Cluster id that absorbed `id`, if any.
    #[must_use]
    pub fn cluster_of(&self, id: &str) -> Option<&str> {
        self.membership.get(id).map(String::as_str)
    }

    /// Resolve an id to the node that represents it in this view.
    #[must_use]
    pub fn representative<'a>(&'a self, id: &'a str) -> &'a str {
        self.cluster_of(id).unwrap_or(id)
    }

    /// Cluster nodes in view order.
    pub fn clusters(&self) -> impl Iterator<Item = &ClusterNode> {
        self.nodes.iter().filter_map(NodeKind::as_cluster)
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Cluster raw export beads.
#[must_use]
pub fn apply_epic_clustering(nodes: &[GraphNode], edges: &[GraphEdge]) -> ClusteredGraph {
    let kinds: Vec<NodeKind> = nodes.iter().cloned().map(NodeKind::Bead).collect();
    cluster_view(&kinds, edges)
}

/// Cluster a view that may already contain cluster nodes.
#[must_use]
pub fn cluster_view(nodes: &[NodeKind], edges: &[GraphEdge]) -> ClusteredGraph {
    cluster_with(nodes, edges, true)
}

#[instrument(skip_all, fields(nodes = nodes.len(), edges = edges.len()))]
fn cluster_with(nodes: &[NodeKind], edges: &[GraphEdge], enabled: bool) -> ClusteredGraph {
    // First occurrence of each id wins.
    let mut position: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
    for (pos, node) in nodes.iter().enumerate() {
        position.entry(node.id()).or_insert(pos);
    }
    let is_first = |pos: usize, node: &NodeKind| position.get(node.id()) == Some(&pos);
    let is_bead = |id: &str| {
        position
            .get(id)
            .is_some_and(|&pos| !nodes[pos].is_cluster())
    };

    let valid: Vec<&GraphEdge> = edges
        .iter()
        .filter(|e| position.contains_key(e.from.as_str()) && position.contains_key(e.to.as_str()))
        .collect();

    let mut membership: HashMap<String, String> = HashMap::new();
    let mut clusters_at: HashMap<usize, ClusterNode> = HashMap::new();

    if enabled {
        let candidates: Vec<(usize, &GraphNode)> = nodes
            .iter()
            .enumerate()
            .filter(|&(pos, node)| is_first(pos, node))
            .filter_map(|(pos, node)| node.as_bead().map(|bead| (pos, bead)))
            .filter(|(_, bead)| bead.is_epic())
            .collect();

        let mut children_of: HashMap<&str, Vec<&str>> = candidates
            .iter()
            .map(|(_, epic)| (epic.id.as_str(), Vec::new()))
            .collect();
        for edge in &valid {
            if edge.is_self_loop() || !is_bead(&edge.from) {
                continue;
            }
            if let Some(children) = children_of.get_mut(edge.to.as_str()) {
                if !children.contains(&edge.from.as_str()) {
                    children.push(edge.from.as_str());
                }
            }
        }

        for (pos, epic) in candidates {
            if membership.contains_key(&epic.id) {
                continue;
            }
            let child_ids: Vec<String> = children_of
                .get(epic.id.as_str())
                .into_iter()
                .flatten()
                .filter(|child| !membership.contains_key(**child))
                .map(|child| (*child).to_string())
                .collect();
            if child_ids.is_empty() {
                continue;
            }

            let cluster = ClusterNode::new(epic, child_ids);
            membership.insert(epic.id.clone(), cluster.id.clone());
            for child in &cluster.child_ids {
                membership.insert(child.clone(), cluster.id.clone());
            }
            debug!(epic = %epic.id, children = cluster.child_count, "collapsed epic");
            clusters_at.insert(pos, cluster);
        }
    }

    let mut out_nodes: Vec<NodeKind> = Vec::with_capacity(nodes.len());
    for (pos, node) in nodes.iter().enumerate() {
        if !is_first(pos, node) {
            continue;
        }
        if let Some(cluster) = clusters_at.remove(&pos) {
            out_nodes.push(NodeKind::Cluster(cluster));
        } else if !membership.contains_key(node.id()) {
            out_nodes.push(node.clone());
        }
    }

    let remap = |id: &str| -> String {
        membership
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    };
    let out_edges: Vec<GraphEdge> = valid
        .into_iter()
        .filter_map(|edge| {
            let from = remap(&edge.from);
            let to = remap(&edge.to);
            let kept = from != to || (edge.is_self_loop() && !membership.contains_key(&edge.from));
            kept.then(|| GraphEdge {
                from,
                to,
                kind: edge.kind.clone(),
            })
        })
        .collect();

    ClusteredGraph {
        nodes: out_nodes,
        edges: out_edges,
        membership,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
