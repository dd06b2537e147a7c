//! Error type for the graph core.
//!
//! Almost every operation is total: unknown edge endpoints are dropped,
//! childless epics are left alone, and unknown focus targets produce a
//! singleton neighborhood. The variants here cover the few inputs that mean
//! an upstream contract was broken and must be surfaced to the caller.

/// Errors from graph simplification and configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A node origin or focal point contained NaN or an infinity.
    #[error("non-finite coordinate for '{id}': ({x}, {y})")]
    NonFiniteCoordinate {
        /// Node id, or `"<focal>"` for the focal point.
        id: String,
        x: f64,
        y: f64,
    },

    /// The fisheye lens parameters cannot produce a finite transform.
    #[error(
        "invalid fisheye lens: radius={radius}, strength={strength} (radius must be finite and > 0)"
    )]
    InvalidFisheye { radius: f64, strength: f64 },

    /// The view configuration could not be parsed.
    #[error("invalid view config: {0}")]
    Config(#[from] toml::de::Error),
}

impl GraphError {
    /// Stable code identifier (`G####`) for machine parsing.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NonFiniteCoordinate { .. } => "G1001",
            Self::InvalidFisheye { .. } => "G1002",
            Self::Config(_) => "G2001",
        }
    }
}
