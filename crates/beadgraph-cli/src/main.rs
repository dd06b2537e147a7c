#![forbid(unsafe_code)]

mod cmd;
mod input;
mod output;
mod settings;

use clap::{Parser, Subcommand};
use output::OutputMode;
use std::env;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "beadgraph: wave leveling and dense-graph simplification for bead dependency graphs",
    long_about = None
)]
struct Cli {
    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format (overrides `FORMAT`).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// View config file (default: `.beadgraph/config.toml`, then the user config dir).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Group beads into parallel execution waves",
        long_about = "Level the dependency graph into waves of beads that can run in parallel. \
                      Beads that can never be scheduled are reported as cycle groups.",
        after_help = "EXAMPLES:\n    # Waves for an export file\n    beadgraph waves graph.json\n\n    # Ignore informational links\n    beadgraph waves graph.json --workflow-only\n\n    # Read from stdin, emit JSON\n    bd graph --json | beadgraph waves --json"
    )]
    Waves(cmd::waves::WavesArgs),

    #[command(
        about = "Compute a simplified, positioned view of the graph",
        long_about = "Cluster epics, dim beads outside a focus neighborhood, place nodes on a \
                      grid, and optionally apply a fisheye lens.",
        after_help = "EXAMPLES:\n    # Cluster epics\n    beadgraph simplify graph.json --cluster\n\n    # Focus two hops around a bead\n    beadgraph simplify graph.json --focus bd-42 --hops 2\n\n    # Fisheye around a cursor\n    beadgraph simplify graph.json --fisheye 400,300 --json"
    )]
    Simplify(cmd::simplify::SimplifyArgs),

    #[command(
        about = "Report density health and scheduling summary",
        after_help = "EXAMPLES:\n    # Health dashboard\n    beadgraph health graph.json\n\n    # Emit machine-readable output\n    beadgraph health graph.json --json"
    )]
    Health(cmd::health::HealthArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("BEADGRAPH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "beadgraph=debug,beadgraph_core=debug,info"
        } else {
            "beadgraph=info,warn"
        })
    });

    let format = env::var("BEADGRAPH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let project_root = env::current_dir()?;
    let output = cli.output_mode();
    let config = settings::resolve_config(cli.config.as_deref(), &project_root)?;
    debug!(?output, json = output.is_json(), "resolved output mode");

    match cli.command {
        Commands::Waves(ref args) => cmd::waves::run_waves(args, output),
        Commands::Simplify(ref args) => cmd::simplify::run_simplify(args, output, &config),
        Commands::Health(ref args) => cmd::health::run_health(args, output, &config),
    }
}
