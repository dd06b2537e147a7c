//! `beadgraph simplify`: clustered, focused, fisheye-distorted layout view.
//!
//! Runs the layout orchestrator once over an export and prints the nodes
//! and edges a renderer would draw. Dimmed entries stay in the output.
//! With `--focus`, the focused bead's direct blockers and dependents are
//! listed as well.

use std::io::Write;
use std::path::PathBuf;

use beadgraph_core::simplify::{LayoutView, NodeKind};
use beadgraph_core::{
    DependencyIndex, GraphExport, LayoutOrchestrator, Point, SimplificationState, ViewConfig,
};
use clap::Args;
use serde::Serialize;

use crate::input::load_export;
use crate::output::{
    ErrorReport, OutputMode, pretty_kv, pretty_section, render_error, render_mode,
};

/// Arguments for `beadgraph simplify`.
#[derive(Args, Debug, Default)]
pub struct SimplifyArgs {
    /// Graph export JSON (`-` or omitted reads stdin).
    pub file: Option<PathBuf>,

    /// Collapse epics and their children into cluster nodes.
    #[arg(long)]
    pub cluster: bool,

    /// Dim everything outside the neighborhood of this bead.
    #[arg(long, value_name = "ID")]
    pub focus: Option<String>,

    /// Focus radius in hops (default: `[focus] default_hops`).
    #[arg(long, requires = "focus", value_parser = parse_hops)]
    pub hops: Option<usize>,

    /// Apply the fisheye lens centred on this point.
    #[arg(long, value_name = "X,Y", value_parser = parse_point)]
    pub fisheye: Option<Point>,
}

impl SimplifyArgs {
    fn state(&self, config: &ViewConfig) -> SimplificationState {
        SimplificationState {
            epic_clustering: self.cluster,
            focus_mode: self.focus.is_some(),
            focus_hops: self.hops.unwrap_or(config.focus.default_hops),
            fisheye_mode: self.fisheye.is_some(),
            selected_node_id: self.focus.clone(),
            ..SimplificationState::default()
        }
    }
}

fn parse_hops(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("hops must be at least 1".to_string()),
        Ok(hops) => Ok(hops),
        Err(e) => Err(format!("invalid hop count '{raw}': {e}")),
    }
}

/// Parse `X,Y` into a point.
fn parse_point(raw: &str) -> Result<Point, String> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{raw}'"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid coordinate '{part}': {e}"))
    };
    Ok(Point::new(parse(x)?, parse(y)?))
}

/// Direct dependency links of the focused bead.
#[derive(Debug, Serialize)]
struct FocusLinks {
    id: String,
    blockers: Vec<String>,
    dependents: Vec<String>,
}

impl FocusLinks {
    fn new(export: &GraphExport, id: &str) -> Self {
        let deps = DependencyIndex::from_graph(&export.nodes, &export.edges);
        Self {
            id: id.to_string(),
            blockers: deps.blockers(id).to_vec(),
            dependents: deps.dependents(id).to_vec(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SimplifyReport {
    #[serde(flatten)]
    view: LayoutView,
    #[serde(skip_serializing_if = "Option::is_none")]
    focus: Option<FocusLinks>,
}

/// Execute `beadgraph simplify`.
pub fn run_simplify(
    args: &SimplifyArgs,
    output: OutputMode,
    config: &ViewConfig,
) -> anyhow::Result<()> {
    let export = load_export(args.file.as_deref())?;
    let state = args.state(config);
    let orchestrator = LayoutOrchestrator::new(*config);

    let view = match orchestrator.layout(&export.nodes, &export.edges, &state, args.fisheye) {
        Ok(view) => view,
        Err(err) => {
            render_error(output, &ErrorReport::from(&err))?;
            anyhow::bail!("layout failed: {err}");
        }
    };

    let report = SimplifyReport {
        view,
        focus: args.focus.as_deref().map(|id| FocusLinks::new(&export, id)),
    };
    render_mode(output, &report, render_report_text, render_report_pretty)
}

fn node_label(node: &NodeKind) -> String {
    match node {
        NodeKind::Bead(bead) => bead.title.clone(),
        NodeKind::Cluster(cluster) => format!("{} [{} beads]", cluster.title, cluster.child_count),
    }
}

fn render_report_text(report: &SimplifyReport, w: &mut dyn Write) -> std::io::Result<()> {
    let view = &report.view;
    for node in &view.nodes {
        writeln!(
            w,
            "node\t{}\t{:.1}\t{:.1}{}",
            node.node.id(),
            node.position.x,
            node.position.y,
            if node.dimmed { "\tdimmed" } else { "" }
        )?;
    }
    for edge in &view.edges {
        writeln!(
            w,
            "edge\t{}\t{}\t{}{}",
            edge.from,
            edge.to,
            edge.kind,
            if edge.dimmed { "\tdimmed" } else { "" }
        )?;
    }
    if let Some(focus) = &report.focus {
        for id in &focus.blockers {
            writeln!(w, "blocker\t{}\t{id}", focus.id)?;
        }
        for id in &focus.dependents {
            writeln!(w, "dependent\t{}\t{id}", focus.id)?;
        }
    }
    Ok(())
}

fn render_report_pretty(report: &SimplifyReport, w: &mut dyn Write) -> std::io::Result<()> {
    let view = &report.view;
    let dimmed = view.nodes.iter().filter(|n| n.dimmed).count();
    let clusters = view.nodes.iter().filter(|n| n.node.is_cluster()).count();

    pretty_section(w, "Simplified view")?;
    pretty_kv(w, "nodes", view.nodes.len().to_string())?;
    pretty_kv(w, "clusters", clusters.to_string())?;
    pretty_kv(w, "edges", view.edges.len().to_string())?;
    pretty_kv(w, "dimmed", dimmed.to_string())?;
    writeln!(w)?;

    for node in &view.nodes {
        writeln!(
            w,
            "{} {:<16} ({:>7.1}, {:>7.1})  {}",
            if node.dimmed { "·" } else { "●" },
            node.node.id(),
            node.position.x,
            node.position.y,
            node_label(&node.node)
        )?;
    }

    if let Some(focus) = &report.focus {
        writeln!(w)?;
        pretty_section(w, &format!("Focus: {}", focus.id))?;
        pretty_kv(w, "blocked by", id_list(&focus.blockers))?;
        pretty_kv(w, "unblocks", id_list(&focus.dependents))?;
    }
    Ok(())
}

fn id_list(ids: &[String]) -> String {
    if ids.is_empty() {
        "(none)".to_string()
    } else {
        ids.join(", ")
    }
}
