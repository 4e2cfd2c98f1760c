//! Compressed sparse row (CSR) graph storage and construction.
//!
//! A [`Graph`] stores adjacency as two flat arrays: `offsets` (row pointers,
//! length `N + 1`) and `edges` (destination ids, length `M`). Node `u`'s
//! outgoing neighbors are `edges[offsets[u]..offsets[u + 1]]`. Optional
//! `weights` run parallel to `edges`.
//!
//! Graphs are immutable once built. A changed topology is rebuilt wholesale
//! from JSON ([`Graph::from_json`]) or from an edge list
//! ([`Graph::from_edges`]).

use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::error::GraphError;

/// Immutable directed graph in compressed sparse row form.
///
/// All ids are `u32`; a graph holds at most `u32::MAX - 1` nodes and
/// `u32::MAX` edges. The arrays are validated on construction, so every
/// algorithm can index them without further checks.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    directed: bool,
    offsets: Vec<u32>,
    edges: Vec<u32>,
    weights: Option<Vec<f64>>,
}

/// Borrowed serialization mirror of the Graph JSON interface.
#[derive(Serialize)]
struct GraphJson<'a> {
    directed: bool,
    offsets: &'a [u32],
    edges: &'a [u32],
    #[serde(skip_serializing_if = "Option::is_none")]
    weights: Option<&'a [f64]>,
}

impl Graph {
    /// Builds a graph from raw CSR arrays, checking every invariant.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidGraph`] if `offsets` is empty, does not
    /// start at 0, decreases anywhere, does not end at `edges.len()`, if an
    /// edge points outside `0..N`, or if `weights` has the wrong length or
    /// contains a negative or non-finite value.
    pub fn from_csr(
        directed: bool,
        offsets: Vec<u32>,
        edges: Vec<u32>,
        weights: Option<Vec<f64>>,
    ) -> Result<Self, GraphError> {
        let Some((&first, rest)) = offsets.split_first() else {
            return Err(GraphError::invalid("offsets must contain at least one entry"));
        };
        if first != 0 {
            return Err(GraphError::invalid(format!(
                "offsets[0] must be 0, found {first}"
            )));
        }

        let mut prev = first;
        for (i, &off) in rest.iter().enumerate() {
            if off < prev {
                return Err(GraphError::invalid(format!(
                    "offsets must be non-decreasing: offsets[{}]={off} < offsets[{i}]={prev}",
                    i + 1
                )));
            }
            prev = off;
        }
        if prev as usize != edges.len() {
            return Err(GraphError::invalid(format!(
                "offsets[N]={prev} does not match edge count {}",
                edges.len()
            )));
        }

        let node_count = offsets.len() - 1;
        if let Some((i, &v)) = edges
            .iter()
            .enumerate()
            .find(|&(_, &v)| v as usize >= node_count)
        {
            return Err(GraphError::invalid(format!(
                "edges[{i}]={v} is out of range for {node_count} nodes"
            )));
        }

        if let Some(w) = &weights {
            if w.len() != edges.len() {
                return Err(GraphError::invalid(format!(
                    "weights has {} entries, expected {}",
                    w.len(),
                    edges.len()
                )));
            }
            if let Some((i, &bad)) = w
                .iter()
                .enumerate()
                .find(|&(_, &x)| !x.is_finite() || x < 0.0)
            {
                return Err(GraphError::invalid(format!(
                    "weights[{i}]={bad} must be finite and non-negative"
                )));
            }
        }

        Ok(Self {
            directed,
            offsets,
            edges,
            weights,
        })
    }

    /// Parses a graph from its JSON description.
    ///
    /// ```text
    /// { "directed": true, "offsets": [0, 1, 2, 2], "edges": [1, 2] }
    /// ```
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Builds a graph from an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidGraph`] if `directed` is not a boolean,
    /// `offsets` or `edges` is missing or not an array of unsigned integers,
    /// `weights` is present but not an array of numbers, or the CSR
    /// invariants do not hold.
    pub fn from_value(value: &Value) -> Result<Self, GraphError> {
        let obj = value
            .as_object()
            .ok_or_else(|| GraphError::invalid("graph description must be a JSON object"))?;

        let directed = match obj.get("directed") {
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                return Err(GraphError::invalid(format!(
                    "'directed' must be a boolean, found {other}"
                )));
            }
            None => return Err(GraphError::invalid("'directed' is missing")),
        };

        let offsets = u32_array(obj.get("offsets"), "offsets")?;
        let edges = u32_array(obj.get("edges"), "edges")?;
        let weights = match obj.get("weights") {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        item.as_f64().ok_or_else(|| {
                            GraphError::invalid(format!("weights[{i}] is not a number: {item}"))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Some(other) => {
                return Err(GraphError::invalid(format!(
                    "'weights' must be an array, found {other}"
                )));
            }
        };

        Self::from_csr(directed, offsets, edges, weights)
    }

    /// Builds a directed graph with `node_count` nodes from an edge list.
    ///
    /// Edges keep their relative order within each source node, so the
    /// adjacency of `u` lists its targets in the order they appear in `edges`.
    pub fn from_edges(node_count: usize, edges: &[(u32, u32)]) -> Result<Self, GraphError> {
        let rows = edges.iter().map(|&(u, v)| (u, v, 1.0));
        let (offsets, targets, _) = build_rows(node_count, rows, edges.len())?;
        Self::from_csr(true, offsets, targets, None)
    }

    /// Builds a weighted directed graph from `(from, to, weight)` triples.
    pub fn from_weighted_edges(
        node_count: usize,
        edges: &[(u32, u32, f64)],
    ) -> Result<Self, GraphError> {
        let (offsets, targets, weights) =
            build_rows(node_count, edges.iter().copied(), edges.len())?;
        Self::from_csr(true, offsets, targets, Some(weights))
    }

    /// Serializes the graph back to the Graph JSON interface.
    pub fn to_json(&self) -> Result<String, GraphError> {
        let mirror = GraphJson {
            directed: self.directed,
            offsets: &self.offsets,
            edges: &self.edges,
            weights: self.weights.as_deref(),
        };
        Ok(serde_json::to_string_pretty(&mirror)?)
    }

    // --- Accessors ---

    /// Returns whether the graph was declared directed.
    ///
    /// Algorithms always follow the stored adjacency; an undirected graph is
    /// expected to store both directions of every edge.
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Number of nodes `N`.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Number of edges `M`.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Row pointer array (length `N + 1`).
    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    /// Flat destination array (length `M`).
    pub fn edges(&self) -> &[u32] {
        &self.edges
    }

    /// Edge weights, if the graph is weighted.
    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    /// Outgoing neighbors of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid node index.
    #[inline]
    pub fn neighbors(&self, node: u32) -> &[u32] {
        &self.edges[self.edge_range(node)]
    }

    /// Index range of `node`'s outgoing edges in the flat arrays.
    #[inline]
    pub fn edge_range(&self, node: u32) -> core::ops::Range<usize> {
        let u = node as usize;
        self.offsets[u] as usize..self.offsets[u + 1] as usize
    }

    /// Weight of the edge stored at flat index `edge` (1.0 when unweighted).
    #[inline]
    pub fn weight_at(&self, edge: usize) -> f64 {
        self.weights.as_ref().map_or(1.0, |w| w[edge])
    }

    /// Weights of `node`'s outgoing edges, parallel to [`neighbors`](Self::neighbors).
    ///
    /// `None` for unweighted graphs.
    pub fn edge_weights(&self, node: u32) -> Option<&[f64]> {
        let range = self.edge_range(node);
        self.weights.as_deref().map(|w| &w[range])
    }

    /// Out-degree of `node`.
    #[inline]
    pub fn out_degree(&self, node: u32) -> usize {
        let u = node as usize;
        (self.offsets[u + 1] - self.offsets[u]) as usize
    }

    /// In-degree of every node, computed in one pass over `edges`.
    pub fn in_degrees(&self) -> Vec<u32> {
        let mut in_degree = vec![0u32; self.node_count()];
        for &v in &self.edges {
            in_degree[v as usize] += 1;
        }
        in_degree
    }

    pub(crate) fn check_source(&self, source: u32) -> Result<(), GraphError> {
        if (source as usize) < self.node_count() {
            Ok(())
        } else {
            Err(GraphError::SourceOutOfRange {
                source_node: source,
                node_count: self.node_count(),
            })
        }
    }
}

impl FromStr for Graph {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json(s)
    }
}

impl TryFrom<Value> for Graph {
    type Error = GraphError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}

/// Reads a JSON array of unsigned 32-bit integers.
fn u32_array(value: Option<&Value>, field: &str) -> Result<Vec<u32>, GraphError> {
    let items = match value {
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(GraphError::invalid(format!(
                "'{field}' must be an array, found {other}"
            )));
        }
        None => return Err(GraphError::invalid(format!("'{field}' is missing"))),
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| {
                    GraphError::invalid(format!(
                        "{field}[{i}] is not an unsigned 32-bit integer: {item}"
                    ))
                })
        })
        .collect()
}

/// Counting-sort an edge list into CSR rows.
#[allow(clippy::type_complexity)]
fn build_rows(
    node_count: usize,
    edges: impl Iterator<Item = (u32, u32, f64)> + Clone,
    edge_count: usize,
) -> Result<(Vec<u32>, Vec<u32>, Vec<f64>), GraphError> {
    if u32::try_from(edge_count).is_err() || u32::try_from(node_count).is_err() {
        return Err(GraphError::invalid("graph exceeds u32 index space"));
    }

    let mut offsets = vec![0u32; node_count + 1];
    for (u, v, _) in edges.clone() {
        if u as usize >= node_count || v as usize >= node_count {
            return Err(GraphError::invalid(format!(
                "edge ({u}, {v}) is out of range for {node_count} nodes"
            )));
        }
        offsets[u as usize + 1] += 1;
    }
    for i in 0..node_count {
        offsets[i + 1] += offsets[i];
    }

    let mut cursor: Vec<u32> = offsets[..node_count].to_vec();
    let mut targets = vec![0u32; edge_count];
    let mut weights = vec![0.0f64; edge_count];
    for (u, v, w) in edges {
        let slot = cursor[u as usize] as usize;
        targets[slot] = v;
        weights[slot] = w;
        cursor[u as usize] += 1;
    }

    Ok((offsets, targets, weights))
}
