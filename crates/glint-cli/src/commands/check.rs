//! Graph health check command.

use std::path::PathBuf;

use clap::Args;

use super::common::{print_json, read_graph};

#[derive(Args)]
pub struct CheckArgs {
    /// CSR graph JSON file
    #[arg(value_name = "GRAPH")]
    input: PathBuf,

    /// Print the health summary as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: CheckArgs) -> anyhow::Result<()> {
    let graph = read_graph(&args.input)?;
    let health = graph.health();

    if args.json {
        return print_json(&health);
    }

    println!("Graph: {}", args.input.display());
    println!("  nodes:       {}", health.node_count);
    println!("  edges:       {}", health.edge_count);
    println!(
        "  out-degree:  min {}, max {}, avg {:.2}",
        health.min_out_degree, health.max_out_degree, health.avg_out_degree
    );
    println!("  weighted:    {}", if graph.weights().is_some() { "yes" } else { "no" });
    if health.is_dag {
        println!("  acyclic:     yes");
    } else if let Err(err) = graph.topo_sort() {
        println!("  acyclic:     no ({err})");
    }
    Ok(())
}
