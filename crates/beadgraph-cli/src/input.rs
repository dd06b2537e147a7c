//! Loading graph exports from a file or stdin.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::Context;
use beadgraph_core::GraphExport;
use tracing::debug;

/// Read a `GraphExport` JSON document. `None` or `-` reads stdin.
pub fn load_export(path: Option<&Path>) -> anyhow::Result<GraphExport> {
    let (raw, source) = match path {
        Some(p) if p != Path::new("-") => (
            fs::read_to_string(p).with_context(|| format!("failed to read {}", p.display()))?,
            p.display().to_string(),
        ),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read graph export from stdin")?;
            (buf, "<stdin>".to_string())
        }
    };

    let export: GraphExport = serde_json::from_str(&raw)
        .with_context(|| format!("{source} is not a valid graph export"))?;
    debug!(
        source = %source,
        nodes = export.nodes.len(),
        edges = export.edges.len(),
        "loaded graph export"
    );
    Ok(export)
}
