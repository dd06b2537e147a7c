//! `beadgraph health`: density tier plus scheduling summary.

use std::io::Write;
use std::path::PathBuf;

use beadgraph_core::simplify::{DensityLevel, classify_with};
use beadgraph_core::{ViewConfig, compute_waves};
use clap::Args;
use serde::Serialize;

use crate::input::load_export;
use crate::output::{OutputMode, render_mode};

/// Arguments for `beadgraph health`.
#[derive(Args, Debug, Default)]
pub struct HealthArgs {
    /// Graph export JSON (`-` or omitted reads stdin).
    pub file: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthOutput {
    density: f64,
    node_count: usize,
    edge_count: usize,
    level: DensityLevel,
    wave_count: usize,
    peak_parallelism: usize,
    cycle_groups: usize,
}

/// Execute `beadgraph health`.
pub fn run_health(
    args: &HealthArgs,
    output: OutputMode,
    config: &ViewConfig,
) -> anyhow::Result<()> {
    let export = load_export(args.file.as_deref())?;
    let stats = export.stats_or_computed();
    let health = classify_with(stats.density, stats.nodes, stats.edges, &config.density);
    let waves = compute_waves(&export.nodes, &export.edges);

    let payload = HealthOutput {
        density: health.density,
        node_count: health.node_count,
        edge_count: health.edge_count,
        level: health.level,
        wave_count: waves.waves.len(),
        peak_parallelism: waves.max_width(),
        cycle_groups: waves.cycles.len(),
    };

    render_mode(output, &payload, render_health_text, render_health_pretty)
}

fn render_health_text(report: &HealthOutput, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "level\t{}", report.level)?;
    writeln!(w, "density\t{:.4}", report.density)?;
    writeln!(w, "nodes\t{}", report.node_count)?;
    writeln!(w, "edges\t{}", report.edge_count)?;
    writeln!(w, "waves\t{}", report.wave_count)?;
    writeln!(w, "cycles\t{}", report.cycle_groups)
}

fn render_health_pretty(report: &HealthOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let density_status = match report.level {
        DensityLevel::Healthy => "✓ healthy",
        DensityLevel::Warning => "◐ warning",
        DensityLevel::Critical => "⚠ critical",
    };
    let cycle_status = if report.cycle_groups == 0 {
        "✓ acyclic"
    } else {
        "⚠ cycles present"
    };

    writeln!(w, "Graph health")?;
    writeln!(w, "{:<20} {:>12}  Status", "Metric", "Value")?;
    writeln!(w, "{}", "-".repeat(52))?;
    writeln!(w, "{:<20} {:>12.3}  {density_status}", "density", report.density)?;
    writeln!(w, "{:<20} {:>12}", "nodes", report.node_count)?;
    writeln!(w, "{:<20} {:>12}", "edges", report.edge_count)?;
    writeln!(w, "{:<20} {:>12}", "waves", report.wave_count)?;
    writeln!(w, "{:<20} {:>12}", "peak_parallelism", report.peak_parallelism)?;
    writeln!(w, "{:<20} {:>12}  {cycle_status}", "cycle_groups", report.cycle_groups)?;

    if report.level != DensityLevel::Healthy {
        writeln!(w)?;
        writeln!(w, "hint: try `beadgraph simplify --cluster` or `--focus <id>`")?;
    }
    Ok(())
}
