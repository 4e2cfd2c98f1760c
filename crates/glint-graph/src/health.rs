//! Structural summary of a graph for reporting surfaces.

use serde::{Deserialize, Serialize};

use crate::csr::Graph;

/// Node/edge counts, out-degree spread and DAG flag of a [`Graph`].
///
/// Pure data: serialized as-is into health artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphHealth {
    /// Number of nodes.
    pub node_count: usize,
    /// Number of edges.
    pub edge_count: usize,
    /// Smallest out-degree (0 for an empty graph).
    pub min_out_degree: usize,
    /// Largest out-degree (0 for an empty graph).
    pub max_out_degree: usize,
    /// Mean out-degree (0.0 for an empty graph).
    pub avg_out_degree: f64,
    /// Whether the graph is acyclic.
    pub is_dag: bool,
}

impl Graph {
    /// Computes the [`GraphHealth`] summary.
    pub fn health(&self) -> GraphHealth {
        let n = self.node_count();
        let (min, max) = self
            .offsets()
            .windows(2)
            .map(|w| (w[1] - w[0]) as usize)
            .fold(None, |acc: Option<(usize, usize)>, d| match acc {
                None => Some((d, d)),
                Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
            })
            .unwrap_or((0, 0));

        let avg = if n == 0 {
            0.0
        } else {
            self.edge_count() as f64 / n as f64
        };

        GraphHealth {
            node_count: n,
            edge_count: self.edge_count(),
            min_out_degree: min,
            max_out_degree: max,
            avg_out_degree: avg,
            is_dag: self.is_dag(),
        }
    }
}
