//! Property-based tests for the graph algorithms.
//!
//! Random graphs (cyclic and acyclic) check that the independent algorithms
//! agree with each other.

use glint_graph::{Graph, UNREACHABLE};
use proptest::prelude::*;

/// Arbitrary directed graph: 1..40 nodes, up to 120 edges, self-loops allowed.
fn any_graph() -> impl Strategy<Value = Graph> {
    (1usize..40).prop_flat_map(|n| {
        prop::collection::vec((0..n as u32, 0..n as u32), 0..120)
            .prop_map(move |edges| Graph::from_edges(n, &edges).unwrap())
    })
}

/// Acyclic graph: every edge goes from a lower to a higher index.
fn any_dag() -> impl Strategy<Value = Graph> {
    (2usize..40).prop_flat_map(|n| {
        prop::collection::vec((0..n as u32, 0..n as u32), 0..120).prop_map(move |edges| {
            let forward: Vec<(u32, u32)> = edges
                .into_iter()
                .filter(|&(u, v)| u != v)
                .map(|(u, v)| (u.min(v), u.max(v)))
                .collect();
            Graph::from_edges(n, &forward).unwrap()
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// `topo_sort` succeeds exactly when `has_cycle` is false.
    #[test]
    fn topo_sort_and_has_cycle_agree(g in any_graph()) {
        prop_assert_eq!(g.topo_sort().is_ok(), !g.has_cycle());
    }

    /// Forward-only graphs are always DAGs.
    #[test]
    fn forward_graphs_are_dags(g in any_dag()) {
        prop_assert!(!g.has_cycle());
        prop_assert!(g.topo_sort().is_ok());
    }

    /// Every edge (u, v) of a DAG has u before v in the topological order.
    #[test]
    fn topo_order_respects_edges(g in any_dag()) {
        let order = g.topo_sort().unwrap();
        prop_assert_eq!(order.len(), g.node_count());

        let mut position = vec![0usize; g.node_count()];
        for (i, &u) in order.iter().enumerate() {
            position[u as usize] = i;
        }
        for u in 0..g.node_count() as u32 {
            for &v in g.neighbors(u) {
                prop_assert!(position[u as usize] < position[v as usize],
                    "edge {} -> {} out of order", u, v);
            }
        }
    }

    /// With unit weights, Dijkstra distances equal BFS hop counts.
    #[test]
    fn dijkstra_matches_bfs_on_unit_weights(g in any_graph(), s in 0u32..40) {
        let source = s % g.node_count() as u32;
        let hops = g.bfs(source).unwrap();
        let dist = g.dijkstra(source).unwrap();
        for (v, (&h, &d)) in hops.iter().zip(dist.iter()).enumerate() {
            if h == UNREACHABLE {
                prop_assert!(d.is_infinite(), "node {} reachable by dijkstra only", v);
            } else {
                prop_assert_eq!(f64::from(h), d, "node {}", v);
            }
        }
    }

    /// BFS reports UNREACHABLE for exactly the nodes DFS never visits.
    #[test]
    fn bfs_sentinel_matches_dfs_reach(g in any_graph(), s in 0u32..40) {
        let source = s % g.node_count() as u32;
        let hops = g.bfs(source).unwrap();
        let mut seen = vec![false; g.node_count()];
        for v in g.dfs(source).unwrap() {
            prop_assert!(!seen[v as usize], "dfs visited {} twice", v);
            seen[v as usize] = true;
        }
        for (v, &h) in hops.iter().enumerate() {
            prop_assert_eq!(h == UNREACHABLE, !seen[v], "node {}", v);
        }
    }

    /// Health counts match the raw arrays.
    #[test]
    fn health_counts_are_consistent(g in any_graph()) {
        let h = g.health();
        prop_assert_eq!(h.node_count, g.node_count());
        prop_assert_eq!(h.edge_count, g.edge_count());
        prop_assert!(h.min_out_degree <= h.max_out_degree);
        prop_assert_eq!(h.is_dag, !g.has_cycle());
    }
}
