//! Cost model calibration command.

use std::path::{Path, PathBuf};

use clap::Args;
use glint_cost::{CostModel, load_samples};

use super::common::{load_config, write_or_print};

#[derive(Args)]
pub struct CalibrateArgs {
    /// Timing samples JSON file (`[{"nodeKind": ..., "us": ...}]`)
    #[arg(value_name = "SAMPLES")]
    samples: PathBuf,

    /// Existing model to recalibrate; unsampled kinds are kept
    #[arg(long, value_name = "PATH")]
    base: Option<PathBuf>,

    /// Output model file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: CalibrateArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config)?;
    let estimator = config.estimator()?;
    let samples = load_samples(&args.samples)?;

    let model = match &args.base {
        Some(path) => estimator.calibrate_onto(&CostModel::load(path)?, &samples)?,
        None => estimator.calibrate(&samples)?,
    };

    tracing::info!(samples = samples.len(), kinds = model.len(), "calibrated");
    let mut json = model.to_json()?;
    json.push('\n');
    write_or_print(args.output.as_deref(), &json)
}
