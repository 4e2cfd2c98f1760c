//! Effect compilation command.

use std::path::{Path, PathBuf};

use clap::Args;
use glint_compiler::Compiler;

use super::common::{load_config, print_json, read_effect, write_or_print};

#[derive(Args)]
pub struct CompileArgs {
    /// Effect JSON file (nodes and wires)
    #[arg(value_name = "EFFECT")]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print compile statistics as JSON instead of the code
    #[arg(long)]
    stats: bool,
}

pub fn run(args: CompileArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config)?;
    let effect = read_effect(&args.input)?;
    let compiled = Compiler::new(config.target_profile()).compile(&effect)?;

    tracing::info!(
        effect = %compiled.name,
        inlined = compiled.stats.inlined,
        loops = compiled.stats.pixel_loops,
        "compiled"
    );
    for id in &compiled.stats.unused {
        eprintln!("warning: node '{id}' does not feed a palette sink and was not emitted");
    }

    if args.stats {
        return print_json(&compiled.stats);
    }
    write_or_print(args.output.as_deref(), &compiled.code)
}
