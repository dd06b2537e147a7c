//! Layout orchestration: compose the simplification passes into a view.
//!
//! Pass order:
//!
//! 1. Epic clustering (when `epic_clustering` is on).
//! 2. Focus membership (when `focus_mode` is on and a bead is selected).
//!    Out-of-focus nodes and edges are flagged `dimmed`, never removed.
//! 3. Row-major grid placement with `ceil(sqrt(n))` columns.
//! 4. Fisheye (when `fisheye_mode` is on and a cursor is supplied).
//!
//! Grid placement only depends on view order, so a caller with no prior
//! layout always gets the same starting positions for the same input.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::cluster::{ClusteredGraph, NodeKind, cluster_view};
use super::fisheye::{Placed, Point, apply_fisheye};
use super::focus::n_hop_neighborhood;
use crate::adjacency::AdjacencyIndex;
use crate::config::ViewConfig;
use crate::error::GraphError;
use crate::model::{DependencyKind, GraphEdge, GraphNode};

// ---------------------------------------------------------------------------
// State and geometry
// ---------------------------------------------------------------------------

/// Which simplifications the viewer has switched on.
///
/// Owned by the caller and passed by reference; the orchestrator never
/// modifies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimplificationState {
    pub epic_clustering: bool,
    pub focus_mode: bool,
    /// Neighborhood radius for focus mode. Zero is read as 1.
    pub focus_hops: usize,
    /// Renderer hint: swap node detail by zoom level.
    pub semantic_zoom: bool,
    pub fisheye_mode: bool,
    pub selected_node_id: Option<String>,
}

impl Default for SimplificationState {
    fn default() -> Self {
        Self {
            epic_clustering: false,
            focus_mode: false,
            focus_hops: 2,
            semantic_zoom: true,
            fisheye_mode: false,
            selected_node_id: None,
        }
    }
}

impl SimplificationState {
    /// The selected id when focus mode applies.
    #[must_use]
    pub fn focus_target(&self) -> Option<&str> {
        self.selected_node_id
            .as_deref()
            .filter(|_| self.focus_mode)
    }

    /// Hops used by the focus pass, never less than one.
    #[must_use]
    pub fn effective_hops(&self) -> usize {
        self.focus_hops.max(1)
    }
}

/// Initial grid geometry in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub column_pitch: f64,
    pub row_pitch: f64,
    /// Offset of the first cell on both axes.
    pub origin: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            column_pitch: 250.0,
            row_pitch: 120.0,
            origin: 50.0,
        }
    }
}

impl GridConfig {
    /// Position of the `index`-th node in a grid `columns` wide.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn cell(&self, index: usize, columns: usize) -> Point {
        let columns = columns.max(1);
        let (row, col) = (index / columns, index % columns);
        Point {
            x: (col as f64).mul_add(self.column_pitch, self.origin),
            y: (row as f64).mul_add(self.row_pitch, self.origin),
        }
    }
}

/// Smallest `c` with `c * c >= n`.
#[must_use]
pub const fn grid_columns(n: usize) -> usize {
    let mut c = 0;
    while c * c < n {
        c += 1;
    }
    c
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// A positioned node in the view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    #[serde(flatten)]
    pub node: NodeKind,
    /// Undistorted grid position.
    pub origin: Point,
    /// Displayed position (equal to `origin` unless fisheye moved it).
    pub position: Point,
    pub dimmed: bool,
}

impl Placed for LayoutNode {
    fn id(&self) -> &str {
        self.node.id()
    }

    fn origin(&self) -> Point {
        self.origin
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }
}

/// A displayed edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEdge {
    /// `e-<index>-<from>-<to>`.
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: DependencyKind,
    pub dimmed: bool,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutView {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
}

impl LayoutView {
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.node.id() == id)
    }

    /// Ids of nodes that are not dimmed.
    pub fn focused_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes
            .iter()
            .filter(|n| !n.dimmed)
            .map(|n| n.node.id())
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Runs the simplification passes in order.
#[derive(Debug, Clone, Default)]
pub struct LayoutOrchestrator {
    config: ViewConfig,
}

impl LayoutOrchestrator {
    #[must_use]
    pub const fn new(config: ViewConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Build a view from raw export data.
    ///
    /// # Errors
    ///
    /// Only the fisheye pass can fail: see [`apply_fisheye`]. With
    /// `fisheye_mode` off or no cursor this never errors.
    #[instrument(
        skip_all,
        fields(nodes = nodes.len(), edges = edges.len(), cursor = cursor.is_some())
    )]
    pub fn layout(
        &self,
        nodes: &[GraphNode],
        edges: &[GraphEdge],
        state: &SimplificationState,
        cursor: Option<Point>,
    ) -> Result<LayoutView, GraphError> {
        let kinds: Vec<NodeKind> = nodes.iter().cloned().map(NodeKind::Bead).collect();
        let view = if state.epic_clustering {
            cluster_view(&kinds, edges)
        } else {
            ClusteredGraph::unclustered(&kinds, edges)
        };

        let focus = state.focus_target().map(|selected| {
            let target = view.representative(selected);
            let adjacency = AdjacencyIndex::from_edges(&view.edges);
            n_hop_neighborhood(target, state.effective_hops(), &adjacency)
        });
        let is_dimmed = |id: &str| {
            focus
                .as_ref()
                .is_some_and(|set: &HashSet<String>| !set.contains(id))
        };

        let columns = grid_columns(view.nodes.len());
        let placed: Vec<LayoutNode> = view
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| {
                let origin = self.config.grid.cell(index, columns);
                LayoutNode {
                    dimmed: is_dimmed(node.id()),
                    node: node.clone(),
                    origin,
                    position: origin,
                }
            })
            .collect();

        let laid_edges: Vec<LayoutEdge> = view
            .edges
            .iter()
            .enumerate()
            .map(|(index, edge)| LayoutEdge {
                id: format!("e-{index}-{}-{}", edge.from, edge.to),
                from: edge.from.clone(),
                to: edge.to.clone(),
                kind: edge.kind.clone(),
                dimmed: is_dimmed(&edge.from) || is_dimmed(&edge.to),
            })
            .collect();

        let placed = match cursor.filter(|_| state.fisheye_mode) {
            Some(focal) => apply_fisheye(&placed, focal, self.config.fisheye)?,
            None => placed,
        };

        debug!(
            nodes = placed.len(),
            edges = laid_edges.len(),
            columns,
            focused = focus.as_ref().map_or(placed.len(), HashSet::len),
            "layout computed"
        );

        Ok(LayoutView {
            nodes: placed,
            edges: laid_edges,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
