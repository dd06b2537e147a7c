//! E2E tests for `beadgraph waves`, `simplify`, and `health`.
//!
//! Each test writes a small graph export into a temp dir and checks the
//! JSON and text output of the binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn bg_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("beadgraph"));
    cmd.current_dir(dir);
    // Keep a developer's own user config out of the lookup.
    cmd.env("HOME", dir);
    cmd.env("XDG_CONFIG_HOME", dir.join(".config"));
    cmd.env("BEADGRAPH_LOG", "error");
    cmd.env_remove("FORMAT");
    cmd
}

fn write_export(dir: &Path, export: &Value) -> PathBuf {
    let path = dir.join("graph.json");
    fs::write(&path, serde_json::to_vec_pretty(export).expect("serialize")).expect("write export");
    path
}

fn run_json(dir: &Path, args: &[&str]) -> Value {
    let output = bg_cmd(dir).args(args).arg("--json").output().expect("command should not crash");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

/// Epic E with children C1, C2; X depends on C1; A → B chain; P ⇄ Q cycle.
fn sample_export() -> Value {
    json!({
        "nodes": [
            {"id": "E", "title": "Epic", "status": "open", "type": "epic"},
            {"id": "C1", "title": "Child one", "status": "in_progress"},
            {"id": "C2", "title": "Child two", "status": "done"},
            {"id": "X", "title": "Outsider", "status": "open"},
            {"id": "A", "title": "First", "status": "open"},
            {"id": "B", "title": "Second", "status": "blocked"},
            {"id": "P", "title": "Ping", "status": "open"},
            {"id": "Q", "title": "Pong", "status": "open"}
        ],
        "edges": [
            {"from": "C1", "to": "E", "type": "parent-child"},
            {"from": "C2", "to": "E", "type": "parent-child"},
            {"from": "C1", "to": "X", "type": "blocks"},
            {"from": "A", "to": "B", "type": "blocks"},
            {"from": "P", "to": "Q", "type": "blocks"},
            {"from": "Q", "to": "P", "type": "blocks"},
            {"from": "ghost", "to": "A", "type": "blocks"}
        ]
    })
}

// ---------------------------------------------------------------------------
// waves
// ---------------------------------------------------------------------------

#[test]
fn waves_json_partitions_every_bead() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_export(dir.path(), &sample_export());

    let json = run_json(dir.path(), &["waves", file.to_str().expect("utf8 path")]);

    assert_eq!(json["hasCycles"], true);
    assert_eq!(json["waves"][0]["beadIds"], json!(["C1", "C2", "A"]));
    assert_eq!(json["waves"][1]["beadIds"], json!(["E", "X", "B"]));
    assert_eq!(json["cycles"], json!([["P", "Q"]]));
}

#[test]
fn waves_reads_stdin() {
    let dir = TempDir::new().expect("tempdir");
    let export = json!({"nodes": [{"id": "solo", "title": "Solo"}], "edges": []});

    bg_cmd(dir.path())
        .args(["waves", "--format", "text"])
        .write_stdin(export.to_string())
        .assert()
        .success()
        .stdout("wave 0\tsolo\n");
}

#[test]
fn workflow_only_ignores_related_links() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_export(
        dir.path(),
        &json!({
            "nodes": [{"id": "a", "title": "a"}, {"id": "b", "title": "b"}],
            "edges": [{"from": "a", "to": "b", "type": "related-to"}]
        }),
    );
    let path = file.to_str().expect("utf8 path");

    let all = run_json(dir.path(), &["waves", path]);
    assert_eq!(all["waves"].as_array().map(Vec::len), Some(2));

    let workflow = run_json(dir.path(), &["waves", path, "--workflow-only"]);
    assert_eq!(workflow["waves"][0]["beadIds"], json!(["a", "b"]));
}

#[test]
fn invalid_export_fails_with_context() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ nope").expect("write");

    bg_cmd(dir.path())
        .args(["waves", path.to_str().expect("utf8 path")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid graph export"));
}

// ---------------------------------------------------------------------------
// simplify
// ---------------------------------------------------------------------------

#[test]
fn simplify_cluster_replaces_epic() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_export(dir.path(), &sample_export());

    let json = run_json(dir.path(), &["simplify", file.to_str().expect("utf8 path"), "--cluster"]);

    let ids: Vec<&str> = json["nodes"]
        .as_array()
        .expect("nodes array")
        .iter()
        .filter_map(|n| n["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["cluster-E", "X", "A", "B", "P", "Q"]);
    assert_eq!(json["nodes"][0]["kind"], "cluster");
    assert_eq!(json["nodes"][0]["childIds"], json!(["C1", "C2"]));
    assert_eq!(json["edges"][0]["from"], "cluster-E");
    assert_eq!(json["edges"][0]["to"], "X");
}

#[test]
fn simplify_focus_dims_distant_beads() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_export(dir.path(), &sample_export());

    let json = run_json(
        dir.path(),
        &["simplify", file.to_str().expect("utf8 path"), "--focus", "A", "--hops", "1"],
    );

    let dimmed: Vec<(&str, bool)> = json["nodes"]
        .as_array()
        .expect("nodes array")
        .iter()
        .map(|n| (n["id"].as_str().unwrap_or(""), n["dimmed"].as_bool().unwrap_or(false)))
        .collect();
    assert!(dimmed.contains(&("A", false)));
    assert!(dimmed.contains(&("B", false)));
    assert!(dimmed.contains(&("E", true)));
    assert!(dimmed.contains(&("P", true)));
}

#[test]
fn simplify_focus_lists_direct_links() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_export(dir.path(), &sample_export());
    let path = file.to_str().expect("utf8 path");

    let json = run_json(dir.path(), &["simplify", path, "--focus", "C1"]);
    assert_eq!(json["focus"]["id"], "C1");
    assert_eq!(json["focus"]["blockers"], json!([]));
    assert_eq!(json["focus"]["dependents"], json!(["E", "X"]));

    bg_cmd(dir.path())
        .args(["simplify", path, "--focus", "B", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("blocker\tB\tA\n"));
}

#[test]
#[cfg(target_os = "linux")]
fn user_config_dir_is_consulted() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_export(dir.path(), &sample_export());
    let user_dir = dir.path().join(".config/beadgraph");
    fs::create_dir_all(&user_dir).expect("mkdir");
    fs::write(user_dir.join("config.toml"), "[grid]
origin = 7.0
").expect("write config");

    let json = run_json(dir.path(), &["simplify", file.to_str().expect("utf8 path")]);
    assert_eq!(json["nodes"][0]["origin"]["x"], 7.0);
}

#[test]
fn simplify_fisheye_moves_nearby_beads() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_export(dir.path(), &sample_export());
    let path = file.to_str().expect("utf8 path");

    // 8 beads → 3 columns; C1 sits at (300, 50).
    let json = run_json(dir.path(), &["simplify", path, "--fisheye", "300,150"]);
    let c1 = &json["nodes"][1];
    assert_eq!(c1["id"], "C1");
    assert_eq!(c1["origin"]["y"], 50.0);
    assert_ne!(c1["position"]["y"], c1["origin"]["y"]);
}

#[test]
fn simplify_rejects_nan_cursor_with_code() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_export(dir.path(), &sample_export());

    bg_cmd(dir.path())
        .args([
            "simplify",
            file.to_str().expect("utf8 path"),
            "--fisheye",
            "NaN,0",
            "--format",
            "text",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[G1001]"));
}

#[test]
fn simplify_uses_project_config() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_export(dir.path(), &sample_export());
    fs::create_dir_all(dir.path().join(".beadgraph")).expect("mkdir");
    fs::write(
        dir.path().join(".beadgraph/config.toml"),
        "[grid]\ncolumn_pitch = 10.0\nrow_pitch = 10.0\norigin = 0.0\n",
    )
    .expect("write config");

    let json = run_json(dir.path(), &["simplify", file.to_str().expect("utf8 path")]);
    assert_eq!(json["nodes"][1]["origin"]["x"], 10.0);
    assert_eq!(json["nodes"][3]["origin"]["y"], 10.0);
}

#[test]
fn malformed_config_is_reported() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_export(dir.path(), &sample_export());
    let config = dir.path().join("view.toml");
    fs::write(&config, "[grid\n").expect("write config");

    bg_cmd(dir.path())
        .args(["simplify", file.to_str().expect("utf8 path")])
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config"));
}

// ---------------------------------------------------------------------------
// health
// ---------------------------------------------------------------------------

#[test]
fn health_prefers_reported_stats() {
    let dir = TempDir::new().expect("tempdir");
    let mut export = sample_export();
    export["stats"] = json!({"nodes": 8, "edges": 6, "density": 0.107});
    let file = write_export(dir.path(), &export);

    let json = run_json(dir.path(), &["health", file.to_str().expect("utf8 path")]);
    assert_eq!(json["level"], "warning");
    assert_eq!(json["nodeCount"], 8);
    assert_eq!(json["cycleGroups"], 1);
}

#[test]
fn health_computes_density_when_missing() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_export(dir.path(), &sample_export());

    // 6 valid edges / (8 * 7) ≈ 0.107
    let json = run_json(dir.path(), &["health", file.to_str().expect("utf8 path")]);
    assert_eq!(json["edgeCount"], 6);
    assert_eq!(json["level"], "warning");
}

#[test]
fn health_pretty_output() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_export(dir.path(), &sample_export());

    bg_cmd(dir.path())
        .env("FORMAT", "pretty")
        .args(["health", file.to_str().expect("utf8 path")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Graph health"))
        .stdout(predicate::str::contains("◐ warning"));
}
