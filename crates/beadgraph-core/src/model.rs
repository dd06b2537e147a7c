//! Node and edge value types shared by every analysis pass.
//!
//! These mirror the IDE's `GraphExport` document. Field names serialize in
//! camelCase and the node/edge `type` field maps to the Rust field `kind`.
//!
//! ## Edge Direction
//!
//! An edge `A → B` means "A is a prerequisite of B": B cannot proceed until
//! A is resolved. The same convention is used for leveling, clustering
//! (children point *into* their epic), and the directed [`DependencyIndex`].
//!
//! [`DependencyIndex`]: crate::adjacency::DependencyIndex

#![allow(clippy::module_name_repetitions)]

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// BeadStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a bead.
///
/// Parsing is case-insensitive and folds the aliases the IDE accepts
/// (`done`/`completed` → [`BeadStatus::Closed`], `active` →
/// [`BeadStatus::InProgress`]). Anything else survives verbatim in
/// [`BeadStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BeadStatus {
    #[default]
    Open,
    InProgress,
    Blocked,
    Closed,
    Review,
    Other(String),
}

impl BeadStatus {
    /// Canonical wire name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Blocked => "blocked",
            Self::Closed => "closed",
            Self::Review => "review",
            Self::Other(raw) => raw,
        }
    }

    /// `true` for closed beads (including the `done`/`completed` aliases).
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl FromStr for BeadStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "open" => Self::Open,
            "in_progress" | "active" => Self::InProgress,
            "blocked" => Self::Blocked,
            "closed" | "done" | "completed" => Self::Closed,
            "review" => Self::Review,
            _ => Self::Other(s.to_string()),
        })
    }
}

impl From<String> for BeadStatus {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }
}

impl From<BeadStatus> for String {
    fn from(value: BeadStatus) -> Self {
        match value {
            BeadStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for BeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DependencyKind
// ---------------------------------------------------------------------------

/// The `type` of a dependency edge.
///
/// The first four variants are *workflow* dependencies: they constrain
/// execution order. Everything else (`references`, `related-to`, …) is an
/// informational link carried through for display only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DependencyKind {
    #[default]
    Blocks,
    ParentChild,
    ConditionalBlocks,
    WaitsFor,
    Other(String),
}

impl DependencyKind {
    /// Canonical wire name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Blocks => "blocks",
            Self::ParentChild => "parent-child",
            Self::ConditionalBlocks => "conditional-blocks",
            Self::WaitsFor => "waits-for",
            Self::Other(raw) => raw,
        }
    }

    /// `true` if this kind affects execution ordering.
    #[must_use]
    pub const fn is_workflow(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for DependencyKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "blocks" => Self::Blocks,
            "parent-child" => Self::ParentChild,
            "conditional-blocks" => Self::ConditionalBlocks,
            "waits-for" => Self::WaitsFor,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for DependencyKind {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<DependencyKind> for String {
    fn from(value: DependencyKind) -> Self {
        match value {
            DependencyKind::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// GraphNode / GraphEdge
// ---------------------------------------------------------------------------

/// A bead as delivered by the graph export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: BeadStatus,
    /// 0 is the highest priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl GraphNode {
    /// An open bead with no priority, labels, or type.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status: BeadStatus::Open,
            priority: None,
            labels: Vec::new(),
            kind: None,
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    #[must_use]
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: BeadStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub const fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// `true` if the bead is typed `epic` or labelled `epic`/`parent`.
    #[must_use]
    pub fn is_epic(&self) -> bool {
        self.kind.as_deref() == Some("epic")
            || self.labels.iter().any(|l| l == "epic" || l == "parent")
    }
}

/// A directed dependency: `from` must be resolved before `to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    #[serde(rename = "type", default)]
    pub kind: DependencyKind,
}

impl GraphEdge {
    /// A `blocks` edge.
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind: DependencyKind::Blocks,
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<DependencyKind>) -> Self {
        self.kind = kind.into();
        self
    }

    /// `true` when both endpoints are the same node.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

// ---------------------------------------------------------------------------
// GraphExport
// ---------------------------------------------------------------------------

/// Aggregate counts reported alongside an export.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ExportStats {
    #[serde(default)]
    pub nodes: usize,
    #[serde(default)]
    pub edges: usize,
    #[serde(default)]
    pub density: f64,
}

/// The graph document fetched by the IDE: nodes, edges, and optional stats.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphExport {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<ExportStats>,
}

impl GraphExport {
    /// Reported stats, or stats computed from the node and edge lists when
    /// the export carries none.
    #[must_use]
    pub fn stats_or_computed(&self) -> ExportStats {
        self.stats.unwrap_or_else(|| {
            let computed = crate::graph::GraphStats::compute(&self.nodes, &self.edges);
            ExportStats {
                nodes: computed.node_count,
                edges: computed.edge_count,
                density: computed.density,
            }
        })
    }
}
