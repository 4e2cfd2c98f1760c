//! Ordering and acyclicity: Kahn's topological sort and three-color cycle check.
//!
//! [`Graph::topo_sort`] is the authoritative DAG check. [`Graph::has_cycle`]
//! answers the same question without building an order and stops at the
//! first back edge. The two always agree.

use crate::csr::Graph;
use crate::error::GraphError;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Stack frame for the iterative three-color DFS.
///
/// `Exit` sits below a node's children on the stack, so popping it simulates
/// the post-order step of a recursive DFS.
#[derive(Clone, Copy)]
enum Frame {
    Enter(u32),
    Exit(u32),
}

impl Graph {
    /// Topologically sorts the graph with Kahn's algorithm.
    ///
    /// Zero in-degree nodes are processed in FIFO order, seeded in ascending
    /// index order, so the result is deterministic.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::CycleDetected`] if fewer than `N` nodes could be
    /// emitted, naming the lowest-index node of a cycle among the leftovers.
    /// Leftover nodes that only sit downstream of a cycle are never named.
    pub fn topo_sort(&self) -> Result<Vec<u32>, GraphError> {
        let n = self.node_count();
        let mut in_degree = self.in_degrees();

        // The queue doubles as the output order: each node enters it once.
        let mut queue = vec![0u32; n];
        let mut tail = 0usize;
        for (u, &deg) in in_degree.iter().enumerate() {
            if deg == 0 {
                queue[tail] = u as u32;
                tail += 1;
            }
        }

        let mut head = 0usize;
        while head < tail {
            let u = queue[head];
            head += 1;
            for &v in self.neighbors(u) {
                let deg = &mut in_degree[v as usize];
                *deg -= 1;
                if *deg == 0 {
                    queue[tail] = v;
                    tail += 1;
                }
            }
        }

        if tail < n {
            let node = self.cycle_node(&in_degree);
            #[cfg(feature = "tracing")]
            tracing::debug!("topo_sort: stalled after {tail} of {n} nodes (node {node})");
            return Err(GraphError::CycleDetected {
                sorted: tail,
                total: n,
                node,
            });
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("topo_sort: {n} nodes in topo order");
        Ok(queue)
    }

    /// Lowest-index node on a cycle, given the in-degrees left after a stalled
    /// Kahn pass.
    ///
    /// Every leftover node has a leftover predecessor, so walking predecessors
    /// from any leftover node must revisit a node, and that node is on a cycle.
    fn cycle_node(&self, in_degree: &[u32]) -> u32 {
        let n = self.node_count();
        let stuck = |u: usize| in_degree[u] > 0;

        let mut pred = vec![u32::MAX; n];
        for u in (0..n).filter(|&u| stuck(u)) {
            for &v in self.neighbors(u as u32) {
                if stuck(v as usize) && pred[v as usize] == u32::MAX {
                    pred[v as usize] = u as u32;
                }
            }
        }

        let Some(start) = (0..n).find(|&u| stuck(u)) else {
            return 0;
        };
        let mut seen = vec![false; n];
        let mut u = start as u32;
        while !seen[u as usize] {
            seen[u as usize] = true;
            u = pred[u as usize];
        }

        let mut lowest = u;
        let mut v = pred[u as usize];
        while v != u {
            lowest = lowest.min(v);
            v = pred[v as usize];
        }
        lowest
    }

    /// Returns `true` if the graph contains a directed cycle.
    ///
    /// Three-color DFS over every root, iterative with enter/exit markers.
    /// A self-loop counts as a cycle.
    pub fn has_cycle(&self) -> bool {
        let n = self.node_count();
        let mut color = vec![Color::White; n];
        let mut stack: Vec<Frame> = Vec::with_capacity(self.edge_count() + n);

        for root in 0..n as u32 {
            if color[root as usize] != Color::White {
                continue;
            }
            stack.push(Frame::Enter(root));

            while let Some(frame) = stack.pop() {
                match frame {
                    Frame::Enter(u) => {
                        if color[u as usize] != Color::White {
                            continue;
                        }
                        color[u as usize] = Color::Gray;
                        stack.push(Frame::Exit(u));
                        for &v in self.neighbors(u).iter().rev() {
                            match color[v as usize] {
                                Color::Gray => return true,
                                Color::White => stack.push(Frame::Enter(v)),
                                Color::Black => {}
                            }
                        }
                    }
                    Frame::Exit(u) => color[u as usize] = Color::Black,
                }
            }
        }

        false
    }

    /// Convenience inverse of [`has_cycle`](Self::has_cycle).
    pub fn is_dag(&self) -> bool {
        !self.has_cycle()
    }
}
