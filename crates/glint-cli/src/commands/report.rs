//! Combined report command.

use std::path::{Path, PathBuf};

use clap::Args;
use glint_compiler::{CompileStats, Compiler, resolve};
use glint_cost::Estimate;
use glint_graph::GraphHealth;
use serde::Serialize;

use super::common::{cost_model, load_config, print_json, read_effect};

#[derive(Args)]
pub struct ReportArgs {
    /// Effect JSON file (nodes and wires)
    #[arg(value_name = "EFFECT")]
    input: PathBuf,

    /// Cost model JSON merged over the configured one
    #[arg(long, value_name = "PATH")]
    cost_model: Option<PathBuf>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    name: String,
    health: GraphHealth,
    estimate: Estimate,
    compile: CompileStats,
    code_lines: usize,
}

pub fn run(args: ReportArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config)?;
    let effect = read_effect(&args.input)?;
    let resolved = resolve(&effect)?;

    let model = cost_model(&config, args.cost_model.as_deref())?;
    let estimate = config
        .estimator()?
        .estimate(resolved.view(), &resolved.kinds(), &model)?;
    let compiled = Compiler::new(config.target_profile()).compile_resolved(&effect, &resolved)?;

    print_json(&Report {
        name: compiled.name,
        health: resolved.view().health(),
        estimate,
        compile: compiled.stats,
        code_lines: compiled.code.lines().count(),
    })
}
