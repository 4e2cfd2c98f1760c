//! Node catalog listing command.

#![allow(clippy::print_literal)]

use clap::Args;
use glint_registry::{NodeCategory, NodeDescriptor, NodeRegistry, OutOfRange, ParamSpec};

use super::common::print_json;

#[derive(Args)]
pub struct NodesArgs {
    /// Show details for a specific node kind
    #[arg(value_name = "KIND")]
    kind: Option<String>,

    /// Print descriptors as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: NodesArgs) -> anyhow::Result<()> {
    let registry = NodeRegistry::new();

    let Some(kind) = &args.kind else {
        if args.json {
            return print_json(&registry.all_nodes());
        }
        list(&registry);
        return Ok(());
    };

    let node = registry
        .get(kind)
        .ok_or_else(|| anyhow::anyhow!("Unknown node kind: {kind}"))?;
    if args.json {
        return print_json(node);
    }
    details(node);
    Ok(())
}

fn list(registry: &NodeRegistry) {
    println!("Node Kinds");
    println!("==========");
    for category in NodeCategory::ALL {
        println!();
        println!("{} - {}", category.name(), category.description());
        for node in registry.nodes_in_category(category) {
            println!("  {:22} {}", node.id, node.description);
        }
    }
    println!();
    println!("Use 'glint nodes <kind>' for parameter details.");
}

fn details(node: &NodeDescriptor) {
    println!("{} ({})", node.id, node.name);
    println!("{}", "=".repeat(node.id.len() + node.name.len() + 3));
    println!();
    println!("{}", node.description);
    println!();
    println!("Category: {}", node.category.name());
    if node.min_inputs == node.max_inputs {
        println!("Inputs:   {}", node.min_inputs);
    } else {
        println!("Inputs:   {}..{}", node.min_inputs, node.max_inputs);
    }

    if node.params.is_empty() {
        println!("Parameters: none");
        return;
    }
    println!();
    println!("Parameters:");
    println!();
    println!("  {:12}  {:8}  {:18}  {:10}  {}", "Name", "Type", "Range", "Default", "Out of range");
    println!("  {:12}  {:8}  {:18}  {:10}  {}", "----", "----", "-----", "-------", "------------");
    for param in node.params {
        print_param(param);
    }
}

fn print_param(param: &ParamSpec) {
    let ty = if param.integer { "int" } else { "float" };
    let range = format!("[{}, {}]", param.min, param.max);
    let default = param
        .default
        .map_or_else(|| "required".to_string(), |d| d.to_string());
    let policy = match param.out_of_range {
        OutOfRange::Reject => "reject",
        OutOfRange::Clamp => "clamp",
    };
    println!("  {:12}  {ty:8}  {range:18}  {default:10}  {policy}", param.name);
}
