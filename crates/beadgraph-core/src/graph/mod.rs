//! Validated dependency graph used by the leveling and analysis passes.
//!
//! # Overview
//!
//! Raw nodes and edges from a graph export are validated into a
//! petgraph-based directed graph whose node indices follow input order.
//!
//! ## Pipeline
//!
//! ```text
//! GraphNode[] + GraphEdge[]
//!        ↓  build::BeadGraph::from_nodes()
//! BeadGraph (DiGraph, unknown endpoints dropped, duplicates collapsed)
//!        ↓  waves::level_graph()
//! WaveResult (waves + remainder)
//!        ↓  cycles::partition_remainder()
//! cycle groups
//! ```
//!
//! ## Cache Keys
//!
//! [`BeadGraph::content_hash`] is a BLAKE3 hash of the node ids and edge
//! endpoints. Nothing in this crate caches; callers that memoize on input
//! identity can compare it against a stored value.

pub mod build;
pub mod cycles;
pub mod stats;

pub use build::{BeadGraph, retain_known_edges};
pub use cycles::partition_remainder;
pub use stats::GraphStats;
