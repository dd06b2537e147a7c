//! `beadgraph waves`: parallel execution waves and cycle groups.

use std::io::Write;
use std::path::PathBuf;

use beadgraph_core::{WaveResult, compute_waves, compute_workflow_waves};
use clap::Args;

use crate::input::load_export;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `beadgraph waves`.
#[derive(Args, Debug, Default)]
pub struct WavesArgs {
    /// Graph export JSON (`-` or omitted reads stdin).
    pub file: Option<PathBuf>,

    /// Only count workflow dependencies (blocks, parent-child,
    /// conditional-blocks, waits-for).
    #[arg(long)]
    pub workflow_only: bool,
}

/// Execute `beadgraph waves`.
pub fn run_waves(args: &WavesArgs, output: OutputMode) -> anyhow::Result<()> {
    let export = load_export(args.file.as_deref())?;
    let result = if args.workflow_only {
        compute_workflow_waves(&export.nodes, &export.edges)
    } else {
        compute_waves(&export.nodes, &export.edges)
    };

    render_mode(output, &result, render_waves_text, render_waves_pretty)
}

fn render_waves_text(result: &WaveResult, w: &mut dyn Write) -> std::io::Result<()> {
    for wave in &result.waves {
        writeln!(w, "wave {}\t{}", wave.level, wave.bead_ids.join(" "))?;
    }
    for cycle in &result.cycles {
        writeln!(w, "cycle\t{}", cycle.join(" "))?;
    }
    Ok(())
}

fn render_waves_pretty(result: &WaveResult, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Execution waves")?;
    if result.waves.is_empty() {
        writeln!(w, "(no beads can start)")?;
    }
    for wave in &result.waves {
        writeln!(
            w,
            "{:<8} {:>3} bead(s)  {}",
            format!("wave {}", wave.level),
            wave.bead_ids.len(),
            wave.bead_ids.join(", ")
        )?;
    }
    writeln!(w)?;
    pretty_kv(w, "leveled", result.leveled_count().to_string())?;
    pretty_kv(w, "peak", result.max_width().to_string())?;

    if result.has_cycles {
        writeln!(w)?;
        pretty_section(w, "⚠ Cycles (cannot be scheduled)")?;
        for (i, cycle) in result.cycles.iter().enumerate() {
            writeln!(w, "{:<8} {}", format!("#{}", i + 1), cycle.join(" → "))?;
        }
    }
    Ok(())
}
