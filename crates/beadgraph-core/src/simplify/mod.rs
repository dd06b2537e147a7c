//! Dense-graph simplification for interactive viewing.
//!
//! Graphs of 50–200 beads are unreadable when drawn naively. These passes
//! reduce visual load without losing data:
//!
//! - [`cluster`]: collapse epics and their children into cluster nodes.
//! - [`focus`]: N-hop neighborhood membership around a selected bead.
//! - [`fisheye`]: radial magnification of positions around a focal point.
//! - [`density`]: health tier for the graph's edge density.
//! - [`layout`]: the orchestrator that runs the passes above in order and
//!   assigns initial grid positions.
//!
//! Each pass takes its inputs by reference and returns new values.

pub mod cluster;
pub mod density;
pub mod fisheye;
pub mod focus;
pub mod layout;

pub use cluster::{
    CLUSTER_PREFIX, ClusterNode, ClusteredGraph, NodeKind, apply_epic_clustering, cluster_view,
};
pub use density::{DensityHealth, DensityLevel, DensityThresholds, classify, classify_with};
pub use fisheye::{FisheyeLens, Placed, Point, apply_fisheye};
pub use focus::n_hop_neighborhood;
pub use layout::{
    GridConfig, LayoutEdge, LayoutNode, LayoutOrchestrator, LayoutView, SimplificationState,
};
