//! Prim's minimum spanning forest.

use std::collections::BinaryHeap;

use super::{check_undirected, MstResult};
use crate::error::Result;
use crate::heap::MinScored;
use crate::index_graph::IndexGraph;

/// Compute a minimum spanning forest with Prim's algorithm.
///
/// Every connected component is grown from its lowest-index vertex: the
/// cheapest edge leaving the tree built so far is taken, with a min-heap of
/// candidate edges.
///
/// # Arguments
/// * `graph`: an undirected graph.
/// * `weight`: weight per edge index.
///
/// # Returns
/// * [`MstResult`]: the forest's edge set.
///
/// # Complexity
/// * Time complexity: **O(|E| log |E|)**.
/// * Auxiliary space: **O(|V| + |E|)**.
pub fn prim<W: Copy + PartialOrd>(
    graph: &IndexGraph,
    mut weight: impl FnMut(usize) -> W,
) -> Result<MstResult> {
    check_undirected(graph)?;
    let n = graph.vertex_count();
    let mut taken = vec![false; n];
    let mut forest = Vec::new();
    let mut heap: BinaryHeap<MinScored<W, usize>> = BinaryHeap::new();

    for root in graph.vertices() {
        if taken[root] {
            continue;
        }
        taken[root] = true;
        for &e in graph.out_edges(root) {
            heap.push(MinScored(weight(e), e));
        }
        while let Some(MinScored(_, e)) = heap.pop() {
            let (s, t) = graph.edge_endpoints(e);
            let grow = match (taken[s], taken[t]) {
                (true, false) => t,
                (false, true) => s,
                _ => continue,
            };
            taken[grow] = true;
            forest.push(e);
            for &next in graph.out_edges(grow) {
                if next != e {
                    heap.push(MinScored(weight(next), next));
                }
            }
        }
    }
    Ok(MstResult::new(forest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::mst::kruskal;
    use crate::index_graph::GraphHints;

    #[test]
    fn agrees_with_kruskal() {
        let mut g = IndexGraph::new_undirected(GraphHints::default());
        g.add_vertices(6);
        let weights = [2.0, 4.0, 1.0, 7.0, 5.0, 1.0, 1.0];
        for (u, v) in [(0, 1), (0, 3), (1, 2), (1, 5), (2, 4), (4, 5), (3, 4)] {
            g.add_edge(u, v).unwrap();
        }
        let p = prim(&g, |e| weights[e]).unwrap();
        let k = kruskal(&g, |e| weights[e]).unwrap();
        assert_eq!(p.total_weight(|e| weights[e]), k.total_weight(|e| weights[e]));
        assert_eq!(p.len(), 5);
    }

    #[test]
    fn disconnected_graph_yields_forest() {
        let mut g = IndexGraph::new_undirected(GraphHints::default());
        g.add_vertices(5);
        g.add_edge(0, 1).unwrap();
        g.add_edge(3, 4).unwrap();
        let p = prim(&g, |_| 1.0).unwrap();
        assert_eq!(p.len(), 2);
    }
}
