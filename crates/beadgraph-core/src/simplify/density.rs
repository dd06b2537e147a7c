//! Density health tiers.
//!
//! Edge density is a cheap proxy for how hard a graph is to read. Above
//! roughly one edge in ten of all possible pairs, a force layout turns into
//! a hairball and the viewer should suggest clustering or focus.

use serde::{Deserialize, Serialize};

use crate::graph::GraphStats;

/// Health tier for a density ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DensityLevel {
    Healthy,
    Warning,
    Critical,
}

impl DensityLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for DensityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tier boundaries. A density strictly above a bound enters that tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityThresholds {
    pub warning: f64,
    pub critical: f64,
}

impl Default for DensityThresholds {
    fn default() -> Self {
        Self {
            warning: 0.10,
            critical: 0.12,
        }
    }
}

impl DensityThresholds {
    #[must_use]
    pub fn level(&self, density: f64) -> DensityLevel {
        if density > self.critical {
            DensityLevel::Critical
        } else if density > self.warning {
            DensityLevel::Warning
        } else {
            DensityLevel::Healthy
        }
    }
}

/// Density with its tier and the counts it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityHealth {
    pub density: f64,
    pub node_count: usize,
    pub edge_count: usize,
    pub level: DensityLevel,
}

impl DensityHealth {
    /// Classify precomputed stats.
    #[must_use]
    pub fn from_stats(stats: &GraphStats, thresholds: &DensityThresholds) -> Self {
        classify_with(stats.density, stats.node_count, stats.edge_count, thresholds)
    }
}

/// Classify with the default thresholds (0.10 / 0.12).
#[must_use]
pub fn classify(density: f64, node_count: usize, edge_count: usize) -> DensityHealth {
    classify_with(density, node_count, edge_count, &DensityThresholds::default())
}

/// Classify with explicit thresholds.
///
/// Density is clamped to `[0, 1]` before classification; reported stats
/// from an export are not trusted to stay in range.
#[must_use]
pub fn classify_with(
    density: f64,
    node_count: usize,
    edge_count: usize,
    thresholds: &DensityThresholds,
) -> DensityHealth {
    let density = density.clamp(0.0, 1.0);
    DensityHealth {
        density,
        node_count,
        edge_count,
        level: thresholds.level(density),
    }
}
