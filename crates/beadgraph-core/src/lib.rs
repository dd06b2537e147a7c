#![forbid(unsafe_code)]
//! beadgraph-core library.
//!
//! Pure, synchronous analysis of bead dependency graphs:
//!
//! - [`waves`]: Kahn leveling into parallel "waves" with cycle isolation.
//! - [`simplify`]: epic clustering, N-hop focus, fisheye distortion,
//!   density health, and the layout orchestrator that composes them.
//! - [`graph`]: validated petgraph model, cycle partitioning, and stats.
//! - [`adjacency`]: arena-indexed undirected and directed neighbor indexes.
//!
//! Every entry point is a pure function of its inputs. Nothing is cached
//! between calls; callers that want memoization can key on
//! [`graph::BeadGraph::content_hash`].
//!
//! # Conventions
//!
//! - **Errors**: Library errors are [`GraphError`] (`thiserror`). The only
//!   fatal inputs are non-finite coordinates and invalid fisheye parameters.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod adjacency;
pub mod config;
pub mod error;
pub mod graph;
pub mod model;
pub mod simplify;
pub mod waves;

pub use adjacency::{AdjacencyIndex, DependencyIndex};
pub use config::ViewConfig;
pub use error::GraphError;
pub use model::{BeadStatus, DependencyKind, GraphEdge, GraphExport, GraphNode};
pub use simplify::{
    ClusterNode, ClusteredGraph, DensityHealth, DensityLevel, FisheyeLens, LayoutOrchestrator,
    LayoutView, NodeKind, Point, SimplificationState, apply_epic_clustering, apply_fisheye,
    classify, n_hop_neighborhood,
};
pub use waves::{Wave, WaveResult, compute_waves, compute_workflow_waves};
