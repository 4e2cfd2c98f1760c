//! Glint CLI - check, analyze, estimate and compile LED effect graphs.

mod commands;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "glint")]
#[command(author, version, about = "Glint effect-graph toolchain", long_about = None)]
struct Cli {
    /// Toolchain config file (default: ./glint.toml, then the user config)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a CSR graph and print its health summary
    Check(commands::check::CheckArgs),

    /// Run traversals and ordering on a CSR graph
    Analyze(commands::analyze::AnalyzeArgs),

    /// Estimate the per-frame cost of an effect
    Estimate(commands::estimate::EstimateArgs),

    /// Compile an effect to firmware code
    Compile(commands::compile::CompileArgs),

    /// Build a cost model from timing samples
    Calibrate(commands::calibrate::CalibrateArgs),

    /// List node kinds and their parameters
    Nodes(commands::nodes::NodesArgs),

    /// Combined health, estimate and compile summary as JSON
    Report(commands::report::ReportArgs),
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = if verbose == 0 {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into())
    } else {
        default.into()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Check(args) => commands::check::run(args),
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Estimate(args) => commands::estimate::run(args, config),
        Commands::Compile(args) => commands::compile::run(args, config),
        Commands::Calibrate(args) => commands::calibrate::run(args, config),
        Commands::Nodes(args) => commands::nodes::run(args),
        Commands::Report(args) => commands::report::run(args, config),
    }
}
