//! Graph distances feeding the stress solver.
//!
//! Traversals mark visited/settled nodes in a [`BitArray`] rather than a `Vec<bool>`.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::bitarray::BitArray;
use crate::error::Result;
use crate::sparse::{SparseBuilder, SparseSymmetricMatrix};

/// Undirected weighted adjacency lists: `adjacency[v]` holds `(neighbour, length)`.
pub type Adjacency = [Vec<(usize, f64)>];

/// Connected components, each sorted ascending, in order of their smallest node.
pub fn connected_components(adjacency: &Adjacency) -> Result<Vec<Vec<usize>>> {
    let n = adjacency.len();
    let mut visited = BitArray::with_len(n)?;
    let mut out: Vec<Vec<usize>> = Vec::new();
    let mut queue: std::collections::VecDeque<usize> = std::collections::VecDeque::new();

    for start in 0..n {
        if visited.get(start) {
            continue;
        }
        visited.set(start, true);
        queue.push_back(start);
        let mut comp: Vec<usize> = Vec::new();

        while let Some(v) = queue.pop_front() {
            comp.push(v);
            for &(u, _) in &adjacency[v] {
                if !visited.get(u) {
                    visited.set(u, true);
                    queue.push_back(u);
                }
            }
        }

        comp.sort_unstable();
        out.push(comp);
    }

    Ok(out)
}

/// Restricts `adjacency` to `nodes`, renumbering them `0..nodes.len()` in the given order.
pub fn induced_subgraph(adjacency: &Adjacency, nodes: &[usize]) -> Vec<Vec<(usize, f64)>> {
    let mut local = vec![usize::MAX; adjacency.len()];
    for (k, &v) in nodes.iter().enumerate() {
        local[v] = k;
    }
    nodes
        .iter()
        .map(|&v| {
            adjacency[v]
                .iter()
                .filter(|&&(u, _)| local[u] != usize::MAX)
                .map(|&(u, len)| (local[u], len))
                .collect()
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    dist: f64,
    hops: usize,
    node: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    // Reversed so `BinaryHeap` pops the closest candidate first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.hops.cmp(&self.hops))
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Shortest-path distances between every pair of nodes reachable from each other.
///
/// With `max_hops: Some(k)` the search from each node stops expanding past `k` edges, which
/// keeps the matrix sparse (only pairs within `k` hops are constrained). `None` keeps every
/// reachable pair.
///
/// A hop-limited entry is the length of the shortest path found using at most `k` edges. It
/// equals the graph distance whenever some shortest path between the pair has at most `k`
/// edges, and is larger otherwise: with unit edges `0-1-2-3` plus a direct `0-3` edge of
/// length 10, `k = 2` stores 10 for `(0, 3)`.
pub fn distance_matrix(
    adjacency: &Adjacency,
    max_hops: Option<usize>,
) -> Result<SparseSymmetricMatrix> {
    let n = adjacency.len();
    let mut builder = SparseBuilder::new(n);
    let mut settled = BitArray::with_len(n)?;
    let mut dist = vec![f64::INFINITY; n];
    let mut touched: Vec<usize> = Vec::new();
    let mut heap: BinaryHeap<Candidate> = BinaryHeap::new();

    for source in 0..n {
        for &v in &touched {
            settled.set(v, false);
            dist[v] = f64::INFINITY;
        }
        touched.clear();

        dist[source] = 0.0;
        touched.push(source);
        heap.push(Candidate {
            dist: 0.0,
            hops: 0,
            node: source,
        });

        while let Some(Candidate { dist: d, hops, node }) = heap.pop() {
            if settled.get(node) {
                continue;
            }
            settled.set(node, true);
            if node > source {
                builder.push(source, node, d)?;
            }
            if max_hops.is_some_and(|k| hops >= k) {
                continue;
            }
            for &(u, len) in &adjacency[node] {
                let next = d + len;
                // Equal-length paths are queued too so the one with fewer hops settles first.
                if !settled.get(u) && next <= dist[u] {
                    if dist[u].is_infinite() {
                        touched.push(u);
                    }
                    dist[u] = next;
                    heap.push(Candidate {
                        dist: next,
                        hops: hops + 1,
                        node: u,
                    });
                }
            }
        }
    }

    let matrix = builder.build();
    tracing::debug!(
        n,
        nnz = matrix.nnz(),
        max_hops = ?max_hops,
        "distance matrix built"
    );
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::{connected_components, distance_matrix, induced_subgraph};

    fn undirected(n: usize, edges: &[(usize, usize, f64)]) -> Vec<Vec<(usize, f64)>> {
        let mut adj = vec![Vec::new(); n];
        for &(a, b, w) in edges {
            adj[a].push((b, w));
            adj[b].push((a, w));
        }
        adj
    }

    #[test]
    fn components_are_found_in_order() {
        let adj = undirected(6, &[(0, 3, 1.0), (1, 2, 1.0), (3, 5, 1.0)]);
        let comps = connected_components(&adj).unwrap();
        assert_eq!(comps, vec![vec![0, 3, 5], vec![1, 2], vec![4]]);
    }

    #[test]
    fn full_distances_follow_shortest_weighted_paths() {
        // 0 -1- 1 -1- 2, plus a long direct 0-2 edge.
        let adj = undirected(3, &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 5.0)]);
        let m = distance_matrix(&adj, None).unwrap();
        assert_eq!(m.nnz(), 6);
        assert_eq!(m.get(0, 1), Some(1.0));
        assert_eq!(m.get(0, 2), Some(2.0));
        assert_eq!(m.get(2, 0), Some(2.0));
    }

    #[test]
    fn hop_limit_keeps_the_matrix_sparse() {
        let adj = undirected(5, &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 4, 1.0)]);
        let m = distance_matrix(&adj, Some(2)).unwrap();
        assert_eq!(m.get(0, 2), Some(2.0));
        assert_eq!(m.get(0, 3), None);
        assert_eq!(m.get(1, 3), Some(2.0));
        assert_eq!(m.nnz(), 2 * (4 + 3));
    }

    #[test]
    fn hop_limit_stores_the_shortest_path_within_the_limit() {
        let adj = undirected(
            4,
            &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (0, 3, 10.0)],
        );
        let limited = distance_matrix(&adj, Some(2)).unwrap();
        assert_eq!(limited.get(0, 2), Some(2.0));
        assert_eq!(limited.get(0, 3), Some(10.0), "0-1-2-3 needs three hops");

        let full = distance_matrix(&adj, None).unwrap();
        assert_eq!(full.get(0, 3), Some(3.0));
    }

    #[test]
    fn hop_limit_prefers_fewer_hops_among_equal_paths() {
        // 0-3-4-2 and 0-1-2 both reach 2 at distance 2, the longer one is relaxed first.
        let adj = undirected(
            6,
            &[
                (0, 3, 0.25),
                (3, 4, 0.25),
                (4, 2, 1.5),
                (0, 1, 1.0),
                (1, 2, 1.0),
                (2, 5, 1.0),
            ],
        );
        let m = distance_matrix(&adj, Some(3)).unwrap();
        assert_eq!(m.get(0, 2), Some(2.0));
        assert_eq!(m.get(0, 5), Some(3.0));
    }

    #[test]
    fn unreachable_pairs_are_unconstrained() {
        let adj = undirected(4, &[(0, 1, 1.0), (2, 3, 2.0)]);
        let m = distance_matrix(&adj, None).unwrap();
        assert_eq!(m.get(0, 2), None);
        assert_eq!(m.get(2, 3), Some(2.0));
    }

    #[test]
    fn induced_subgraph_renumbers_nodes() {
        let adj = undirected(4, &[(0, 3, 1.0), (3, 2, 2.0), (1, 2, 4.0)]);
        let sub = induced_subgraph(&adj, &[2, 3]);
        assert_eq!(sub, vec![vec![(1, 2.0)], vec![(0, 2.0)]]);
    }
}
