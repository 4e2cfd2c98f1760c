//! Integration tests for glint-config.

use glint_compiler::{Compiler, EffectGraph, NodeSpec};
use glint_config::{ConfigError, ToolchainConfig};
use glint_cost::{Coefficients, CostModel};
use tempfile::TempDir;

#[test]
fn save_load_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("glint.toml");

    let mut config = ToolchainConfig::default();
    config.budget.frame_budget_ms = 10.0;
    config.target.leds = "pixels".into();
    config.save(&path).unwrap();

    let loaded = ToolchainConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
    assert!(loaded.validate().is_ok());
}

#[test]
fn missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");
    let err = ToolchainConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn explicit_path_is_discovered() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "[budget]\nops_per_ms = 1000.0\n").unwrap();

    let (config, source) = ToolchainConfig::discover(Some(&path)).unwrap();
    assert_eq!(source.as_deref(), Some(path.as_path()));
    assert_eq!(config.budget.ops_per_ms, 1000.0);
}

#[test]
fn relative_cost_model_resolves_against_config_dir() {
    let dir = TempDir::new().unwrap();
    CostModel::new()
        .with("sin", Coefficients::new(9999, 1, 1, 0))
        .save(dir.path().join("calibrated.json"))
        .unwrap();
    std::fs::write(
        dir.path().join("glint.toml"),
        "[cost]\nmodel = \"calibrated.json\"\n",
    )
    .unwrap();

    let config = ToolchainConfig::load(dir.path().join("glint.toml")).unwrap();
    assert_eq!(config.cost.model, Some(dir.path().join("calibrated.json")));

    let model = config.cost_model().unwrap();
    assert_eq!(model.get("sin").map(|c| c.ops), Some(9999));
    // Kinds absent from the file keep their built-in coefficients.
    assert_eq!(model.get("add"), CostModel::builtin().get("add"));
}

#[test]
fn broken_cost_model_surfaces_cost_error() {
    let dir = TempDir::new().unwrap();
    let model = dir.path().join("model.json");
    std::fs::write(&model, "{ not json").unwrap();

    let mut config = ToolchainConfig::default();
    config.cost.model = Some(model);
    assert!(matches!(config.cost_model(), Err(ConfigError::Cost(_))));
}

#[test]
fn target_profile_drives_compiler() {
    let config = ToolchainConfig::from_toml("[target]\nleds = \"strip\"\n").unwrap();
    let compiled = Compiler::new(config.target_profile())
        .compile(&EffectGraph::default().node(NodeSpec::new("p", "palette-interpolate")))
        .unwrap();
    assert!(compiled.code.contains("strip[i].r"));
}
