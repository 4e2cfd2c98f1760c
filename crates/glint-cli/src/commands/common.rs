//! Shared CLI helpers used across multiple commands.

use std::path::Path;

use anyhow::Context;
use glint_compiler::EffectGraph;
use glint_config::ToolchainConfig;
use glint_cost::CostModel;
use glint_graph::Graph;
use serde::Serialize;

/// Loads and validates the toolchain config.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<ToolchainConfig> {
    let (config, source) = ToolchainConfig::discover(explicit)?;
    match &source {
        Some(path) => tracing::info!(path = %path.display(), "using config"),
        None => tracing::info!("using built-in config defaults"),
    }
    config
        .validate()
        .with_context(|| match source {
            Some(path) => format!("invalid config '{}'", path.display()),
            None => "invalid config".to_string(),
        })?;
    Ok(config)
}

/// Configured cost model, with `extra` merged over it when given.
pub fn cost_model(config: &ToolchainConfig, extra: Option<&Path>) -> anyhow::Result<CostModel> {
    let mut model = config.cost_model()?;
    if let Some(path) = extra {
        model.merge(&CostModel::load(path)?);
        tracing::info!(path = %path.display(), "merged cost model");
    }
    Ok(model)
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))
}

/// Reads a node/wire effect JSON file.
pub fn read_effect(path: &Path) -> anyhow::Result<EffectGraph> {
    EffectGraph::from_json(&read_text(path)?)
        .with_context(|| format!("invalid effect '{}'", path.display()))
}

/// Reads a CSR graph JSON file.
pub fn read_graph(path: &Path) -> anyhow::Result<Graph> {
    Graph::from_json(&read_text(path)?)
        .with_context(|| format!("invalid graph '{}'", path.display()))
}

/// Writes `text` to `output`, or to stdout when `None`.
pub fn write_or_print(output: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("failed to write '{}'", path.display()))?;
            tracing::info!(path = %path.display(), bytes = text.len(), "wrote output");
        }
        None => print!("{text}"),
    }
    Ok(())
}

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
