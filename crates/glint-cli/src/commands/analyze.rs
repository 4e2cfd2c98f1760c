//! Traversal and ordering command.

use std::path::PathBuf;

use clap::Args;
use glint_graph::UNREACHABLE;
use serde::Serialize;

use super::common::{print_json, read_graph};

#[derive(Args)]
pub struct AnalyzeArgs {
    /// CSR graph JSON file
    #[arg(value_name = "GRAPH")]
    input: PathBuf,

    /// Source node for BFS, DFS and Dijkstra
    #[arg(long, default_value = "0")]
    source: u32,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

/// Unreachable nodes are `null` in every per-node array.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Analysis {
    source: u32,
    bfs_levels: Vec<Option<u32>>,
    dfs_order: Vec<u32>,
    distances: Vec<Option<f64>>,
    topo_order: Option<Vec<u32>>,
    cycle: Option<String>,
}

pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let graph = read_graph(&args.input)?;

    let bfs_levels = graph
        .bfs(args.source)?
        .into_iter()
        .map(|d| (d != UNREACHABLE).then_some(d))
        .collect();
    let dfs_order = graph.dfs(args.source)?;
    let distances = graph
        .dijkstra(args.source)?
        .into_iter()
        .map(|d| d.is_finite().then_some(d))
        .collect();
    let (topo_order, cycle) = match graph.topo_sort() {
        Ok(order) => (Some(order), None),
        Err(err) => (None, Some(err.to_string())),
    };

    let analysis = Analysis {
        source: args.source,
        bfs_levels,
        dfs_order,
        distances,
        topo_order,
        cycle,
    };

    if args.json {
        return print_json(&analysis);
    }

    println!("Source node {}", analysis.source);
    println!();
    println!("  {:>6}  {:>6}  {:>12}", "node", "hops", "distance");
    for (node, (hops, dist)) in analysis
        .bfs_levels
        .iter()
        .zip(&analysis.distances)
        .enumerate()
    {
        let hops = hops.map_or_else(|| "-".to_string(), |h| h.to_string());
        let dist = dist.map_or_else(|| "-".to_string(), |d| format!("{d:.3}"));
        println!("  {node:>6}  {hops:>6}  {dist:>12}");
    }
    println!();
    println!("DFS preorder: {}", join(&analysis.dfs_order));
    match (&analysis.topo_order, &analysis.cycle) {
        (Some(order), _) => println!("Topological order: {}", join(order)),
        (None, Some(err)) => println!("Topological order: none ({err})"),
        (None, None) => {}
    }
    Ok(())
}

fn join(nodes: &[u32]) -> String {
    nodes
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
