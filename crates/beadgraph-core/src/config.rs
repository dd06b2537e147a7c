//! View configuration.
//!
//! Loaded from TOML. Every section and field has a default, so an empty
//! document (or no file at all) gives the stock viewer behaviour:
//!
//! ```toml
//! [fisheye]
//! radius = 200.0
//! strength = 3.0
//!
//! [grid]
//! column_pitch = 250.0
//! row_pitch = 120.0
//! origin = 50.0
//!
//! [density]
//! warning = 0.10
//! critical = 0.12
//!
//! [focus]
//! default_hops = 2
//! ```

use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::simplify::{DensityThresholds, FisheyeLens, GridConfig};

/// Tunables for the simplification passes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub fisheye: FisheyeLens,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub density: DensityThresholds,
    #[serde(default)]
    pub focus: FocusConfig,
}

/// Focus-mode defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusConfig {
    /// Hop count used when the caller does not pick one.
    #[serde(default = "default_hops")]
    pub default_hops: usize,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            default_hops: default_hops(),
        }
    }
}

const fn default_hops() -> usize {
    2
}

impl ViewConfig {
    /// Parse a TOML document.
    ///
    /// # Errors
    ///
    /// [`GraphError::Config`] if the document is not valid TOML or a field
    /// has the wrong type.
    pub fn from_toml_str(raw: &str) -> Result<Self, GraphError> {
        Ok(toml::from_str(raw)?)
    }
}
