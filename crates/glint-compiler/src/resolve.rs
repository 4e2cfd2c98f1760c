//! Validation of an authored effect into a checked, index-based graph.
//!
//! [`resolve`] turns string ids into indices, attaches each node's kind,
//! checks arity and parameters against the registry, and orders the nodes
//! with the graph engine's topological sort over a CSR view of the wires.

use std::collections::HashMap;

use glint_graph::{Graph, GraphError};
use glint_registry::{NodeKind, ParamViolation};

use crate::error::CompileError;
use crate::model::{EffectGraph, NodeSpec};

/// A validated node.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedNode {
    /// Author id.
    pub id: String,
    /// Kind from the registry.
    pub kind: NodeKind,
    /// Effective inputs as node indices, in operand order.
    pub inputs: Vec<usize>,
    /// Every declared parameter with defaults applied, in schema order.
    pub params: Vec<(&'static str, f64)>,
}

impl ResolvedNode {
    /// Value of a parameter after defaults and clamping.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not in the kind's schema.
    pub fn param(&self, name: &str) -> f64 {
        self.params
            .iter()
            .find(|&&(n, _)| n == name)
            .map(|&(_, v)| v)
            .unwrap_or_else(|| panic!("{} has no parameter '{name}'", self.kind))
    }
}

/// A validated, acyclic effect graph.
#[derive(Debug, Clone)]
pub struct ResolvedGraph {
    nodes: Vec<ResolvedNode>,
    view: Graph,
    order: Vec<usize>,
}

impl ResolvedGraph {
    /// Nodes in declaration order.
    pub fn nodes(&self) -> &[ResolvedNode] {
        &self.nodes
    }

    /// CSR view of the dependencies (edge `input -> consumer`).
    pub fn view(&self) -> &Graph {
        &self.view
    }

    /// Node indices in dependency order.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Cost-model key of every node, aligned with the CSR view.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.nodes.iter().map(|n| n.kind.id()).collect()
    }
}

/// Validates `graph` and orders it.
///
/// # Errors
///
/// The first [`CompileError`] encountered, checking in this order: ids and
/// kinds, wires, inputs and arity, parameters, sinks, cycles.
pub fn resolve(graph: &EffectGraph) -> Result<ResolvedGraph, CompileError> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(graph.nodes.len());
    let mut kinds = Vec::with_capacity(graph.nodes.len());
    for (i, node) in graph.nodes.iter().enumerate() {
        if index.insert(node.id.as_str(), i).is_some() {
            return Err(CompileError::DuplicateNode {
                node: node.id.clone(),
            });
        }
        let kind = NodeKind::from_id(&node.kind).ok_or_else(|| CompileError::UnknownNodeType {
            node: node.id.clone(),
            kind: node.kind.clone(),
        })?;
        kinds.push(kind);
    }

    // Wire-derived inputs, grouped by target in declaration order.
    let mut wired: Vec<Vec<usize>> = vec![Vec::new(); graph.nodes.len()];
    for wire in &graph.wires {
        let lookup = |end: &str| {
            index.get(end).copied().ok_or_else(|| CompileError::DanglingWire {
                from: wire.from.clone(),
                to: wire.to.clone(),
                missing: end.to_string(),
            })
        };
        let from = lookup(&wire.from)?;
        let to = lookup(&wire.to)?;
        wired[to].push(from);
    }

    let mut nodes = Vec::with_capacity(graph.nodes.len());
    for ((spec, kind), wired) in graph.nodes.iter().zip(kinds.iter().copied()).zip(wired) {
        let inputs = if spec.inputs.is_empty() {
            wired
        } else {
            spec.inputs
                .iter()
                .map(|input| {
                    index.get(input.as_str()).copied().ok_or_else(|| {
                        CompileError::MissingInput {
                            node: spec.id.clone(),
                            kind: kind.id(),
                            input: input.clone(),
                        }
                    })
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        if inputs.len() < kind.min_inputs() || inputs.len() > kind.max_inputs() {
            return Err(CompileError::Arity {
                node: spec.id.clone(),
                kind: kind.id(),
                min: kind.min_inputs(),
                max: kind.max_inputs(),
                actual: inputs.len(),
            });
        }

        let params = resolve_params(spec, kind)?;
        nodes.push(ResolvedNode {
            id: spec.id.clone(),
            kind,
            inputs,
            params,
        });
    }

    for node in &nodes {
        for &input in &node.inputs {
            let upstream = &nodes[input];
            if upstream.kind.is_sink() && node.kind != NodeKind::Output {
                return Err(CompileError::SinkInput {
                    node: node.id.clone(),
                    kind: node.kind.id(),
                    input: upstream.id.clone(),
                });
            }
        }
    }

    if !nodes.iter().any(|n| n.kind.is_sink()) {
        return Err(CompileError::NoSink);
    }

    let edges: Vec<(u32, u32)> = nodes
        .iter()
        .enumerate()
        .flat_map(|(consumer, n)| n.inputs.iter().map(move |&i| (i as u32, consumer as u32)))
        .collect();
    let view = Graph::from_edges(nodes.len(), &edges)?;

    let order = match view.topo_sort() {
        Ok(order) => order.into_iter().map(|u| u as usize).collect(),
        Err(GraphError::CycleDetected { node, .. }) => {
            let culprit = &nodes[node as usize];
            return Err(CompileError::Cycle {
                node: culprit.id.clone(),
                kind: culprit.kind.id(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    tracing::debug!(
        nodes = nodes.len(),
        edges = view.edge_count(),
        "resolved effect graph"
    );

    Ok(ResolvedGraph { nodes, view, order })
}

fn resolve_params(
    spec: &NodeSpec,
    kind: NodeKind,
) -> Result<Vec<(&'static str, f64)>, CompileError> {
    let invalid = |param: &str, reason: String| CompileError::InvalidParameter {
        node: spec.id.clone(),
        kind: kind.id(),
        param: param.to_string(),
        reason,
    };

    if let Some(name) = spec.parameters.keys().find(|k| kind.param(k).is_none()) {
        return Err(CompileError::UnknownParameter {
            node: spec.id.clone(),
            kind: kind.id(),
            param: name.clone(),
        });
    }

    let mut params = Vec::with_capacity(kind.params().len());
    for schema in kind.params() {
        let raw = match (spec.parameters.get(schema.name), schema.default) {
            (Some(value), _) => value
                .as_f64()
                .ok_or_else(|| invalid(schema.name, format!("{value} is not a number")))?,
            (None, Some(default)) => default,
            (None, None) => return Err(invalid(schema.name, "required parameter is missing".into())),
        };
        let value = schema.resolve(raw).map_err(|violation| match violation {
            ParamViolation::OutOfRange { value, min, max } => CompileError::ParameterRange {
                node: spec.id.clone(),
                kind: kind.id(),
                param: schema.name,
                value,
                min,
                max,
            },
            other => invalid(schema.name, other.to_string()),
        })?;
        params.push((schema.name, value));
    }

    if kind == NodeKind::Clamp {
        let (min, max) = (params[0].1, params[1].1);
        if min > max {
            return Err(invalid("min", format!("min {min} exceeds max {max}")));
        }
    }

    Ok(params)
}
