//! Single-source traversals: breadth-first, depth-first and Dijkstra.
//!
//! Every traversal is iterative and sizes its work structure up front from
//! the node or edge count, so graphs with millions of nodes neither overflow
//! the call stack nor reallocate mid-traversal.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::csr::Graph;
use crate::error::GraphError;

/// Distance reported by [`Graph::bfs`] for nodes the source cannot reach.
pub const UNREACHABLE: u32 = u32::MAX;

/// Min-heap entry for Dijkstra's priority queue.
#[derive(Debug, Clone, Copy, PartialEq)]
struct HeapEntry {
    dist: f64,
    node: u32,
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Graph {
    /// Breadth-first hop distances from `source`.
    ///
    /// The metric is edge count; weights are ignored. Unreached nodes report
    /// [`UNREACHABLE`]. The FIFO queue is a flat array of length `N`: each
    /// node is enqueued at most once.
    pub fn bfs(&self, source: u32) -> Result<Vec<u32>, GraphError> {
        self.check_source(source)?;
        let n = self.node_count();

        let mut dist = vec![UNREACHABLE; n];
        let mut queue = vec![0u32; n];
        let (mut head, mut tail) = (0usize, 0usize);

        dist[source as usize] = 0;
        queue[tail] = source;
        tail += 1;

        while head < tail {
            let u = queue[head];
            head += 1;
            let next = dist[u as usize] + 1;
            for &v in self.neighbors(u) {
                if dist[v as usize] == UNREACHABLE {
                    dist[v as usize] = next;
                    queue[tail] = v;
                    tail += 1;
                }
            }
        }

        Ok(dist)
    }

    /// Depth-first preorder from `source`.
    ///
    /// Neighbors are pushed in reverse adjacency order so the first-visited
    /// order matches a recursive DFS. Unreached nodes are excluded.
    pub fn dfs(&self, source: u32) -> Result<Vec<u32>, GraphError> {
        self.check_source(source)?;
        let n = self.node_count();

        let mut visited = vec![false; n];
        let mut order = Vec::with_capacity(n);
        // Each visited node pushes at most its out-degree: M + 1 total.
        let mut stack = Vec::with_capacity(self.edge_count() + 1);
        stack.push(source);

        while let Some(u) = stack.pop() {
            if visited[u as usize] {
                continue;
            }
            visited[u as usize] = true;
            order.push(u);
            for &v in self.neighbors(u).iter().rev() {
                if !visited[v as usize] {
                    stack.push(v);
                }
            }
        }

        Ok(order)
    }

    /// Single-source shortest paths for non-negative weights.
    ///
    /// Absent weights count as 1. Decrease-key is lazy: an improved distance
    /// pushes a duplicate entry and the visited set discards stale ones.
    /// Unreachable nodes report `f64::INFINITY`.
    pub fn dijkstra(&self, source: u32) -> Result<Vec<f64>, GraphError> {
        self.check_source(source)?;
        let n = self.node_count();

        let mut dist = vec![f64::INFINITY; n];
        let mut visited = vec![false; n];
        let mut heap = BinaryHeap::with_capacity(self.edge_count() + 1);

        dist[source as usize] = 0.0;
        heap.push(HeapEntry {
            dist: 0.0,
            node: source,
        });

        while let Some(HeapEntry { dist: d, node: u }) = heap.pop() {
            if visited[u as usize] {
                continue;
            }
            visited[u as usize] = true;

            for e in self.edge_range(u) {
                let v = self.edges()[e] as usize;
                let candidate = d + self.weight_at(e);
                if candidate < dist[v] {
                    dist[v] = candidate;
                    heap.push(HeapEntry {
                        dist: candidate,
                        node: v as u32,
                    });
                }
            }
        }

        Ok(dist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> Graph {
        // 0 → 1 → 3, 0 → 2 → 3, 4 isolated
        Graph::from_edges(5, &[(0, 1), (0, 2), (1, 3), (2, 3)]).unwrap()
    }

    #[test]
    fn bfs_hop_distances() {
        let d = diamond().bfs(0).unwrap();
        assert_eq!(d, vec![0, 1, 1, 2, UNREACHABLE]);
    }

    #[test]
    fn bfs_rejects_bad_source() {
        let err = diamond().bfs(9).unwrap_err();
        assert_eq!(
            err,
            GraphError::SourceOutOfRange {
                source_node: 9,
                node_count: 5
            }
        );
    }

    #[test]
    fn dfs_matches_recursive_preorder() {
        // 0 → [1, 4], 1 → [2, 3], 3 → [4]
        let g = Graph::from_edges(5, &[(0, 1), (0, 4), (1, 2), (1, 3), (3, 4)]).unwrap();
        assert_eq!(g.dfs(0).unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn dfs_excludes_unreached() {
        let order = diamond().dfs(1).unwrap();
        assert_eq!(order, vec![1, 3]);
    }

    #[test]
    fn dfs_survives_long_chain() {
        let n = 200_000u32;
        let edges: Vec<(u32, u32)> = (0..n - 1).map(|i| (i, i + 1)).collect();
        let g = Graph::from_edges(n as usize, &edges).unwrap();
        assert_eq!(g.dfs(0).unwrap().len(), n as usize);
    }

    #[test]
    fn dijkstra_prefers_cheaper_longer_path() {
        let g = Graph::from_weighted_edges(
            4,
            &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 5.0), (2, 3, 0.5)],
        )
        .unwrap();
        let d = g.dijkstra(0).unwrap();
        assert_eq!(d, vec![0.0, 1.0, 2.0, 2.5]);
    }

    #[test]
    fn dijkstra_unreachable_is_infinite() {
        let d = diamond().dijkstra(0).unwrap();
        assert_eq!(d[3], 2.0);
        assert!(d[4].is_infinite() && d[4] > 0.0);
    }

    #[test]
    fn dijkstra_zero_weight_edges() {
        let g = Graph::from_weighted_edges(3, &[(0, 1, 0.0), (1, 2, 0.0)]).unwrap();
        assert_eq!(g.dijkstra(0).unwrap(), vec![0.0, 0.0, 0.0]);
    }
}
