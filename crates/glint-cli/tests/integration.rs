//! Integration tests for the `glint` binary.
//!
//! Every invocation runs in a temporary directory with the user config
//! directory redirected there, so no config outside the test is picked up.

use std::path::Path;
use std::process::{Command, Output};

use glint_cost::{CostModel, estimate_runtime};
use glint_graph::Graph;
use serde_json::Value;
use tempfile::TempDir;

const CHAIN: &str = r#"{"directed": true, "offsets": [0, 1, 2, 2], "edges": [1, 2]}"#;
const LOOP: &str = r#"{"directed": true, "offsets": [0, 1, 2], "edges": [1, 0]}"#;

const EFFECT: &str = r#"{
    "name": "pulse",
    "nodes": [
        {"id": "bass", "type": "spectrum-bin", "parameters": {"bin": 2}},
        {"id": "louder", "type": "scale", "inputs": ["bass"], "parameters": {"factor": 2}},
        {"id": "paint", "type": "palette-interpolate", "inputs": ["louder"]}
    ],
    "wires": []
}"#;

fn glint(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_glint"));
    cmd.current_dir(dir)
        .env("XDG_CONFIG_HOME", dir)
        .env("HOME", dir)
        .env_remove("RUST_LOG");
    cmd
}

fn run(dir: &Path, args: &[&str]) -> Output {
    glint(dir).args(args).output().expect("failed to run glint")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

fn workspace(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        std::fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

// ---------------------------------------------------------------------------
// help / nodes
// ---------------------------------------------------------------------------

#[test]
fn cli_help_lists_commands() {
    let dir = workspace(&[]);
    let output = run(dir.path(), &["--help"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Glint effect-graph toolchain"));
    for cmd in ["check", "analyze", "estimate", "compile", "calibrate", "nodes", "report"] {
        assert!(out.contains(cmd), "help should mention '{cmd}'");
    }
}

#[test]
fn cli_nodes_lists_catalog() {
    let dir = workspace(&[]);
    let output = run(dir.path(), &["nodes"]);
    assert!(output.status.success());
    let out = stdout(&output);
    for kind in ["spectrum-bin", "palette-interpolate", "tempo-confidence", "position-gradient"] {
        assert!(out.contains(kind), "listing should contain '{kind}'");
    }
}

#[test]
fn cli_nodes_detail_shows_parameters() {
    let dir = workspace(&[]);
    let output = run(dir.path(), &["nodes", "spectrum-range"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("startBin"));
    assert!(out.contains("endBin"));
    assert!(out.contains("clamp"));

    let output = run(dir.path(), &["nodes", "spectrum-bin", "--json"]);
    assert!(output.status.success());
    let value = json(&output);
    assert_eq!(value["id"], "spectrum-bin");
    assert_eq!(value["params"][0]["name"], "bin");
}

#[test]
fn cli_nodes_unknown_kind_fails() {
    let dir = workspace(&[]);
    let output = run(dir.path(), &["nodes", "wobble"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("wobble"));
}

// ---------------------------------------------------------------------------
// check / analyze
// ---------------------------------------------------------------------------

#[test]
fn cli_check_reports_health() {
    let dir = workspace(&[("chain.json", CHAIN)]);
    let output = run(dir.path(), &["check", "chain.json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("nodes:       3"));
    assert!(out.contains("acyclic:     yes"));

    let output = run(dir.path(), &["check", "chain.json", "--json"]);
    let value = json(&output);
    assert_eq!(value["nodeCount"], 3);
    assert_eq!(value["edgeCount"], 2);
    assert_eq!(value["isDag"], true);
}

#[test]
fn cli_check_rejects_malformed_graph() {
    let dir = workspace(&[("bad.json", r#"{"directed": "yes", "offsets": [0], "edges": []}"#)]);
    let output = run(dir.path(), &["check", "bad.json"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("invalid graph"));
}

#[test]
fn cli_analyze_orders_chain() {
    let dir = workspace(&[("chain.json", CHAIN)]);
    let output = run(dir.path(), &["analyze", "chain.json", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value = json(&output);
    assert_eq!(value["bfsLevels"], serde_json::json!([0, 1, 2]));
    assert_eq!(value["dfsOrder"], serde_json::json!([0, 1, 2]));
    assert_eq!(value["distances"], serde_json::json!([0.0, 1.0, 2.0]));
    assert_eq!(value["topoOrder"], serde_json::json!([0, 1, 2]));
    assert!(value["cycle"].is_null());
}

#[test]
fn cli_analyze_reports_cycle_and_unreachable() {
    let dir = workspace(&[("loop.json", LOOP), ("chain.json", CHAIN)]);
    let value = json(&run(dir.path(), &["analyze", "loop.json", "--json"]));
    assert!(value["topoOrder"].is_null());
    assert!(value["cycle"].as_str().unwrap().contains("cycle"));

    let value = json(&run(dir.path(), &["analyze", "chain.json", "--source", "2", "--json"]));
    assert_eq!(value["bfsLevels"], serde_json::json!([null, null, 0]));

    let output = run(dir.path(), &["analyze", "chain.json", "--source", "9"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("out of range"));
}

#[test]
fn cli_verbose_logs_graph_ordering() {
    let dir = workspace(&[("chain.json", CHAIN), ("loop.json", LOOP)]);
    let output = run(dir.path(), &["analyze", "chain.json", "-v"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("topo_sort: 3 nodes in topo order"));

    let output = run(dir.path(), &["analyze", "loop.json", "-v"]);
    assert!(stderr(&output).contains("topo_sort: stalled after 0 of 2 nodes"));
}

// ---------------------------------------------------------------------------
// compile
// ---------------------------------------------------------------------------

#[test]
fn cli_compile_writes_output_file() {
    let dir = workspace(&[("pulse.json", EFFECT)]);
    let output = run(dir.path(), &["compile", "pulse.json", "-o", "pulse.c"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let code = std::fs::read_to_string(dir.path().join("pulse.c")).unwrap();
    assert!(code.starts_with("// glint effect: pulse\n"));
    assert!(code.contains("fmodf((spectrogram[2] * 2.0f), 1.0f)"));
}

#[test]
fn cli_compile_is_deterministic() {
    let dir = workspace(&[("pulse.json", EFFECT)]);
    let first = run(dir.path(), &["compile", "pulse.json"]);
    let second = run(dir.path(), &["compile", "pulse.json"]);
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn cli_compile_uses_project_config_symbols() {
    let dir = workspace(&[
        ("pulse.json", EFFECT),
        ("glint.toml", "[target]\nleds = \"strip\"\nspectrogram = \"fft\"\n"),
    ]);
    let output = run(dir.path(), &["compile", "pulse.json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("strip[i].r"));
    assert!(out.contains("fft[2]"));
}

#[test]
fn cli_compile_rejects_out_of_range_bin() {
    let effect = EFFECT.replace(r#""bin": 2"#, r#""bin": 64"#);
    let dir = workspace(&[("bad.json", effect.as_str())]);
    let output = run(dir.path(), &["compile", "bad.json"]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("'bass'"), "got: {err}");
    assert!(err.contains("bin"), "got: {err}");
}

#[test]
fn cli_compile_stats_as_json() {
    let dir = workspace(&[("pulse.json", EFFECT)]);
    let value = json(&run(dir.path(), &["compile", "pulse.json", "--stats"]));
    assert_eq!(value["nodeCount"], 3);
    assert_eq!(value["pixelLoops"], 1);
    assert_eq!(value["inlined"], 2);
}

#[test]
fn cli_invalid_config_fails() {
    let dir = workspace(&[
        ("pulse.json", EFFECT),
        ("broken.toml", "[budget]\nops_per_ms = -1.0\n"),
    ]);
    let output = run(dir.path(), &["compile", "pulse.json", "--config", "broken.toml"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("invalid config"));
}

// ---------------------------------------------------------------------------
// estimate / report
// ---------------------------------------------------------------------------

#[test]
fn cli_estimate_matches_library() {
    let dir = workspace(&[("pulse.json", EFFECT)]);
    let output = run(dir.path(), &["estimate", "pulse.json", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value = json(&output);

    let view = Graph::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
    let expected = estimate_runtime(
        &view,
        &["spectrum-bin", "scale", "palette-interpolate"],
        &CostModel::builtin(),
    )
    .unwrap();
    assert_eq!(value["totalOps"], expected.total_ops);
    assert_eq!(value["frameBudgetMs"].as_f64().unwrap(), expected.frame_budget_ms);
    assert_eq!(value["breakdown"]["scale"]["count"], 1);
}

#[test]
fn cli_estimate_strict_fails_over_budget() {
    let dir = workspace(&[
        ("pulse.json", EFFECT),
        ("glint.toml", "[budget]\nframe_budget_ms = 0.000001\n"),
    ]);
    let output = run(dir.path(), &["estimate", "pulse.json"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Over budget"));

    let output = run(dir.path(), &["estimate", "pulse.json", "--strict"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("frame budget"));
}

#[test]
fn cli_report_combines_artifacts() {
    let dir = workspace(&[("pulse.json", EFFECT)]);
    let output = run(dir.path(), &["report", "pulse.json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value = json(&output);
    assert_eq!(value["name"], "pulse");
    assert_eq!(value["health"]["isDag"], true);
    assert_eq!(value["health"]["nodeCount"], 3);
    assert!(value["estimate"]["totalOps"].as_u64().unwrap() > 0);
    assert_eq!(value["compile"]["pixelLoops"], 1);
    assert!(value["codeLines"].as_u64().unwrap() > 10);
}

// ---------------------------------------------------------------------------
// calibrate
// ---------------------------------------------------------------------------

#[test]
fn cli_calibrate_writes_model() {
    let dir = workspace(&[(
        "samples.json",
        r#"[{"nodeKind": "sin", "us": 10.0}, {"nodeKind": "sin", "us": 30.0}]"#,
    )]);
    let output = run(dir.path(), &["calibrate", "samples.json", "-o", "model.json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let model = CostModel::load(dir.path().join("model.json")).unwrap();
    // 20 us average at 240k ops/ms.
    assert_eq!(model.get("sin").map(|c| c.ops), Some(4800));
    assert_eq!(model.len(), 1);
}

#[test]
fn cli_calibrate_onto_base_keeps_other_kinds() {
    let dir = workspace(&[("samples.json", r#"[{"nodeKind": "add", "us": 1.0}]"#)]);
    CostModel::builtin()
        .save(dir.path().join("base.json"))
        .unwrap();

    let output = run(
        dir.path(),
        &["calibrate", "samples.json", "--base", "base.json", "-o", "model.json"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let model = CostModel::load(dir.path().join("model.json")).unwrap();
    assert_eq!(model.len(), CostModel::builtin().len());
    assert_eq!(model.get("add").map(|c| c.ops), Some(240));
    assert_eq!(model.get("sin"), CostModel::builtin().get("sin"));
}

#[test]
fn cli_calibrate_rejects_negative_timing() {
    let dir = workspace(&[("samples.json", r#"[{"nodeKind": "add", "us": -5.0}]"#)]);
    let output = run(dir.path(), &["calibrate", "samples.json"]);
    assert!(!output.status.success());
}
