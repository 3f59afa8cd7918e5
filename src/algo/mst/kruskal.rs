//! Kruskal's minimum spanning forest.

use super::{check_undirected, edge_less, MstResult};
use crate::error::Result;
use crate::index_graph::IndexGraph;
use crate::unionfind::UnionFind;

/// Compute a minimum spanning forest with Kruskal's algorithm.
///
/// Initially each vertex is its own disjoint subgraph; edges are visited in
/// ascending weight order and accepted whenever they connect two disjoint
/// trees, tracked with a union & find structure.
///
/// # Arguments
/// * `graph`: an undirected graph.
/// * `weight`: weight per edge index; any partially ordered copyable type.
///
/// # Returns
/// * [`MstResult`]: the forest's edge set.
///
/// # Complexity
/// * Time complexity: **O(|E| log |E|)**.
/// * Auxiliary space: **O(|V| + |E|)**.
///
/// # Example
/// ```
/// use ixgraph::{GraphHints, IndexGraph};
/// use ixgraph::algo::mst::kruskal;
///
/// let mut g = IndexGraph::new_undirected(GraphHints::default());
/// g.add_vertices(4);
/// let weights = [1.0, 2.0, 3.0, 4.0];
/// for (u, v) in [(0, 1), (1, 2), (2, 3), (3, 0)] {
///     g.add_edge(u, v).unwrap();
/// }
/// let mst = kruskal(&g, |e| weights[e]).unwrap();
/// assert_eq!(mst.edges(), &[0, 1, 2]);
/// assert_eq!(mst.total_weight(|e| weights[e]), 6.0);
/// ```
pub fn kruskal<W: Copy + PartialOrd>(
    graph: &IndexGraph,
    mut weight: impl FnMut(usize) -> W,
) -> Result<MstResult> {
    check_undirected(graph)?;
    let weights: Vec<W> = graph.edges().map(&mut weight).collect();
    let mut order: Vec<usize> = graph.edges().collect();
    order.sort_unstable_by(|&a, &b| {
        if edge_less(&weights, a, b) {
            core::cmp::Ordering::Less
        } else {
            core::cmp::Ordering::Greater
        }
    });
    Ok(accept_sorted(graph, &order))
}

/// Kruskal with the edge array sorted on two worker threads. The result is
/// identical to [`kruskal`]; only the preprocessing differs.
pub fn kruskal_parallel_sort(
    graph: &IndexGraph,
    mut weight: impl FnMut(usize) -> f64,
) -> Result<MstResult> {
    check_undirected(graph)?;
    let weights: Vec<f64> = graph.edges().map(&mut weight).collect();
    let m = weights.len();
    if m < 1024 {
        return kruskal(graph, |e| weights[e]);
    }
    let mut left: Vec<usize> = (0..m / 2).collect();
    let mut right: Vec<usize> = (m / 2..m).collect();
    std::thread::scope(|scope| {
        let weights = &weights;
        let worker = scope.spawn(move || {
            left.sort_unstable_by(|&a, &b| {
                if edge_less(weights, a, b) {
                    core::cmp::Ordering::Less
                } else {
                    core::cmp::Ordering::Greater
                }
            });
            left
        });
        right.sort_unstable_by(|&a, &b| {
            if edge_less(weights, a, b) {
                core::cmp::Ordering::Less
            } else {
                core::cmp::Ordering::Greater
            }
        });
        let left = worker.join().expect("sort worker never panics");
        let mut order = Vec::with_capacity(m);
        let (mut i, mut j) = (0, 0);
        while i < left.len() && j < right.len() {
            if edge_less(weights, left[i], right[j]) {
                order.push(left[i]);
                i += 1;
            } else {
                order.push(right[j]);
                j += 1;
            }
        }
        order.extend_from_slice(&left[i..]);
        order.extend_from_slice(&right[j..]);
        Ok(accept_sorted(graph, &order))
    })
}

fn accept_sorted(graph: &IndexGraph, order: &[usize]) -> MstResult {
    let mut subgraphs = UnionFind::new(graph.vertex_count());
    let mut forest = Vec::new();
    for &e in order {
        let (s, t) = graph.edge_endpoints(e);
        // accept iff the edge connects two disjoint trees
        if subgraphs.union(s, t) {
            forest.push(e);
        }
    }
    MstResult::new(forest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;
    use crate::index_graph::GraphHints;

    #[test]
    fn spanning_forest_per_component() {
        let mut g = IndexGraph::new_undirected(GraphHints::default());
        g.add_vertices(6);
        let weights = [2.0, 1.0, 5.0, 1.0, 9.0];
        for (u, v) in [(0, 1), (1, 2), (0, 2), (3, 4), (4, 5)] {
            g.add_edge(u, v).unwrap();
        }
        let mst = kruskal(&g, |e| weights[e]).unwrap();
        assert_eq!(mst.edges(), &[0, 1, 3, 4]);
        assert_eq!(mst.total_weight(|e| weights[e]), 13.0);
    }

    #[test]
    fn directed_input_is_rejected() {
        let g = IndexGraph::new_directed(GraphHints::default());
        assert_eq!(
            kruskal(&g, |_| 1.0).unwrap_err(),
            GraphError::DirectedGraphRejected
        );
    }

    #[test]
    fn parallel_sort_matches_sequential() {
        use rand::{Rng, SeedableRng};
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let n = 64;
        let mut g = IndexGraph::new_undirected(GraphHints {
            allow_parallel_edges: true,
            ..GraphHints::default()
        });
        g.add_vertices(n);
        let mut weights = Vec::new();
        for _ in 0..2048 {
            let u = rng.gen_range(0..n);
            let v = rng.gen_range(0..n);
            if u != v {
                g.add_edge(u, v).unwrap();
                weights.push(rng.gen_range(0..1000) as f64);
            }
        }
        let seq = kruskal(&g, |e| weights[e]).unwrap();
        let par = kruskal_parallel_sort(&g, |e| weights[e]).unwrap();
        assert_eq!(seq, par);
    }
}
