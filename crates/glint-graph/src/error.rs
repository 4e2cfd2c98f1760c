//! Error types for graph construction and analysis.

use thiserror::Error;

/// Errors that can occur while building or analyzing a [`Graph`](crate::Graph).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    /// The graph description is malformed (missing arrays, broken CSR invariants, ...).
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// The graph contains at least one cycle, so it has no topological order.
    #[error("cycle detected: only {sorted} of {total} nodes could be ordered (node {node} is on a cycle)")]
    CycleDetected {
        /// Number of nodes emitted before the sort stalled.
        sorted: usize,
        /// Total number of nodes in the graph.
        total: usize,
        /// Lowest-index node of a cycle that blocked the sort.
        node: u32,
    },

    /// A traversal source index is outside `0..node_count`.
    #[error("source node {source_node} out of range (graph has {node_count} nodes)")]
    SourceOutOfRange {
        /// The requested source node.
        source_node: u32,
        /// Number of nodes in the graph.
        node_count: usize,
    },

    /// The graph JSON could not be parsed at all.
    #[error("failed to parse graph JSON: {0}")]
    Json(String),
}

impl GraphError {
    /// Create an invalid graph error from any displayable reason.
    pub fn invalid(reason: impl Into<String>) -> Self {
        GraphError::InvalidGraph(reason.into())
    }
}

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        GraphError::Json(err.to_string())
    }
}
