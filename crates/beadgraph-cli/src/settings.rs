//! View config resolution.
//!
//! Lookup order (first existing file wins):
//! 1. `--config <path>` (must exist)
//! 2. `./.beadgraph/config.toml`
//! 3. `<user config dir>/beadgraph/config.toml`
//!
//! With no file, [`ViewConfig::default`] applies.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use beadgraph_core::ViewConfig;
use tracing::debug;

/// Project-local config path under `root`.
pub fn project_config_path(root: &Path) -> PathBuf {
    root.join(".beadgraph").join("config.toml")
}

/// Per-user config path, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("beadgraph").join("config.toml"))
}

/// Resolve and load the view config.
pub fn resolve_config(explicit: Option<&Path>, project_root: &Path) -> anyhow::Result<ViewConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }

    let candidates = std::iter::once(project_config_path(project_root)).chain(user_config_path());
    for candidate in candidates {
        if candidate.is_file() {
            return load_config(&candidate);
        }
    }

    debug!("no view config found, using defaults");
    Ok(ViewConfig::default())
}

fn load_config(path: &Path) -> anyhow::Result<ViewConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = ViewConfig::from_toml_str(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    debug!(path = %path.display(), "loaded view config");
    Ok(config)
}
