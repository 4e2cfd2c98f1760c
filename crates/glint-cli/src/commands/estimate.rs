//! Frame-budget estimation command.

use std::path::{Path, PathBuf};

use clap::Args;
use glint_compiler::resolve;

use super::common::{cost_model, load_config, print_json, read_effect};

#[derive(Args)]
pub struct EstimateArgs {
    /// Effect JSON file (nodes and wires)
    #[arg(value_name = "EFFECT")]
    input: PathBuf,

    /// Cost model JSON merged over the configured one
    #[arg(long, value_name = "PATH")]
    cost_model: Option<PathBuf>,

    /// Print the estimate as JSON
    #[arg(long)]
    json: bool,

    /// Exit with an error when the estimate exceeds the frame budget
    #[arg(long)]
    strict: bool,
}

pub fn run(args: EstimateArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config)?;
    let effect = read_effect(&args.input)?;
    let resolved = resolve(&effect)?;
    let model = cost_model(&config, args.cost_model.as_deref())?;
    let estimate = config
        .estimator()?
        .estimate(resolved.view(), &resolved.kinds(), &model)?;

    if args.json {
        print_json(&estimate)?;
    } else {
        let name = effect.name.as_deref().unwrap_or("untitled");
        println!("Effect: {name}");
        println!();
        println!("  {:24}  {:>5}  {:>10}", "kind", "count", "ops");
        for (kind, cost) in &estimate.breakdown {
            println!("  {kind:24}  {:>5}  {:>10}", cost.count, cost.ops);
        }
        println!();
        println!("  total ops:   {}", estimate.total_ops);
        println!(
            "  frame time:  {:.4} ms of {:.4} ms ({:.1}% CPU)",
            estimate.ms, estimate.frame_budget_ms, estimate.cpu_pct
        );
        println!(
            "  memory:      {:.2} KB ({} reads, {} writes), {} I/O calls",
            estimate.mem_kb, estimate.mem_reads, estimate.mem_writes, estimate.io_calls
        );
        if !estimate.fallback_kinds.is_empty() {
            println!(
                "  fallback:    {} (default coefficients)",
                estimate.fallback_kinds.join(", ")
            );
        }
        println!();
        if estimate.within_budget() {
            println!("Within budget ({:.4} ms headroom)", estimate.headroom_ms());
        } else {
            println!("Over budget by {:.4} ms", -estimate.headroom_ms());
        }
    }

    if args.strict && !estimate.within_budget() {
        anyhow::bail!(
            "estimated {:.4} ms exceeds the {:.4} ms frame budget",
            estimate.ms,
            estimate.frame_budget_ms
        );
    }
    Ok(())
}
