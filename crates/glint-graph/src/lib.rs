//! Glint Graph - compact graph storage and iterative graph algorithms.
//!
//! This crate is the leaf of the glint toolchain. It knows nothing about
//! effect nodes: it stores a directed graph in compressed sparse row (CSR)
//! form and runs index-based algorithms over it.
//!
//! # Representation
//!
//! - [`Graph`] - immutable CSR adjacency (`offsets` + `edges` + optional `weights`)
//! - [`GraphHealth`] - node/edge counts, out-degree spread, DAG flag
//!
//! # Algorithms
//!
//! | Operation                         | Strategy                                       |
//! |-----------------------------------|------------------------------------------------|
//! | [`bfs`](Graph::bfs)               | flat FIFO queue sized to `N`                   |
//! | [`dfs`](Graph::dfs)               | explicit stack, reverse-pushed neighbors       |
//! | [`dijkstra`](Graph::dijkstra)     | binary heap, lazy decrease-key                 |
//! | [`topo_sort`](Graph::topo_sort)   | Kahn's algorithm                               |
//! | [`has_cycle`](Graph::has_cycle)   | three-color DFS with enter/exit markers        |
//!
//! None of them recurse, so graphs with millions of nodes are safe to analyze.
//!
//! # Example
//!
//! ```rust
//! use glint_graph::{Graph, UNREACHABLE};
//!
//! let g = Graph::from_json(r#"{"directed": true, "offsets": [0, 1, 2, 2], "edges": [1, 2]}"#)?;
//! assert_eq!(g.topo_sort()?, vec![0, 1, 2]);
//! assert_eq!(g.bfs(1)?, vec![UNREACHABLE, 0, 1]);
//! # Ok::<(), glint_graph::GraphError>(())
//! ```

pub mod csr;
pub mod error;
mod health;
mod order;
mod traversal;

pub use csr::Graph;
pub use error::GraphError;
pub use health::GraphHealth;
pub use traversal::UNREACHABLE;
