//! Output formatting shared by `waves`, `simplify`, and `health`.
//!
//! The mode is picked in this order: `--format`, then `--json`, then the
//! `FORMAT` environment variable (`pretty`, `text` or `json`). Without any of
//! those, a terminal gets [`OutputMode::Pretty`] and a pipe gets
//! [`OutputMode::Text`].
//!
//! Reports go to stdout. Failures and logs go to stderr.

use clap::ValueEnum;
use serde::Serialize;
use std::io::{self, IsTerminal, Write};

use beadgraph_core::GraphError;

const RULE_WIDTH: usize = 56;

/// Heading line followed by a dashed rule.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    writeln!(w, "{}", "-".repeat(RULE_WIDTH))
}

/// `key:` padded to a fixed column, then the value.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<12} {}", format!("{key}:"), value.as_ref())
}

/// How a command prints its report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Sections and aligned columns for a terminal.
    Pretty,
    /// Tab-separated rows for scripts.
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl OutputMode {
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }

    /// Mode named by a `FORMAT` value, ignoring case. Unknown names give `None`.
    fn from_env_value(raw: &str) -> Option<Self> {
        Self::from_str(raw, true).ok()
    }
}

fn pick_mode(
    flag: Option<OutputMode>,
    json: bool,
    env: Option<&str>,
    stdout_is_tty: bool,
) -> OutputMode {
    flag.or_else(|| json.then_some(OutputMode::Json))
        .or_else(|| env.and_then(OutputMode::from_env_value))
        .unwrap_or(if stdout_is_tty {
            OutputMode::Pretty
        } else {
            OutputMode::Text
        })
}

/// Mode for this process from CLI flags, `FORMAT`, and whether stdout is a TTY.
pub fn resolve_output_mode(flag: Option<OutputMode>, json: bool) -> OutputMode {
    let env = std::env::var("FORMAT").ok();
    pick_mode(flag, json, env.as_deref(), io::stdout().is_terminal())
}

/// Print `report` to stdout: JSON directly, otherwise through `text` or `pretty`.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    report: &T,
    text: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    write_report(&mut io::stdout().lock(), mode, report, text, pretty)
}

fn write_report<T: Serialize>(
    out: &mut dyn Write,
    mode: OutputMode,
    report: &T,
    text: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
        OutputMode::Text => text(report, out)?,
        OutputMode::Pretty => pretty(report, out)?,
    }
    Ok(())
}

/// A core failure as shown to the user, with its stable code and a hint.
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub code: &'static str,
    pub message: String,
    pub hint: &'static str,
}

impl From<&GraphError> for ErrorReport {
    fn from(err: &GraphError) -> Self {
        let hint = match err {
            GraphError::NonFiniteCoordinate { .. } => {
                "check the --fisheye cursor and node coordinates for NaN or infinity"
            }
            GraphError::InvalidFisheye { .. } => {
                "set [fisheye] radius to a finite value greater than zero"
            }
            GraphError::Config(_) => "fix the view config TOML or remove the file",
        };
        Self {
            code: err.code(),
            message: err.to_string(),
            hint,
        }
    }
}

/// Print `report` to stderr in the requested mode.
pub fn render_error(mode: OutputMode, report: &ErrorReport) -> anyhow::Result<()> {
    write_error(&mut io::stderr().lock(), mode, report)
}

fn write_error(out: &mut dyn Write, mode: OutputMode, report: &ErrorReport) -> anyhow::Result<()> {
    if mode.is_json() {
        serde_json::to_writer_pretty(&mut *out, &serde_json::json!({ "error": report }))?;
        writeln!(out)?;
    } else {
        writeln!(out, "error[{}]: {}", report.code, report.message)?;
        writeln!(out, "  hint: {}", report.hint)?;
    }
    Ok(())
}
