//! Single-source and all-pairs shortest paths.
//!
//! These are the workhorses the distance measures and the postman tour lean
//! on. Weights are `f64` and must be non-negative; unreachable vertices are
//! reported at `f64::INFINITY`.

use std::collections::BinaryHeap;

use crate::error::{GraphError, Result};
use crate::heap::MinScored;
use crate::index_graph::IndexGraph;
use crate::mapping::Id;
use crate::path::Path;
use crate::LabelledGraph;

/// Shortest-path distances and parent edges out of a single source.
pub struct ShortestPathTree<'a> {
    graph: &'a IndexGraph,
    source: usize,
    dist: Vec<f64>,
    parent_edge: Vec<usize>,
}

impl<'a> ShortestPathTree<'a> {
    pub fn source(&self) -> usize {
        self.source
    }

    /// Distance from the source to `v`; `f64::INFINITY` when unreachable.
    ///
    /// **Panics** if `v` is out of bounds.
    pub fn distance(&self, v: usize) -> f64 {
        self.dist[v]
    }

    pub fn distances(&self) -> &[f64] {
        &self.dist
    }

    /// A shortest path from the source to `v`, or `None` when unreachable.
    pub fn path(&self, v: usize) -> Option<Path<'a>> {
        if self.dist[v].is_infinite() {
            return None;
        }
        let mut edges = Vec::new();
        let mut at = v;
        while at != self.source {
            let e = self.parent_edge[at];
            edges.push(e);
            at = self
                .graph
                .edge_endpoint(e, at)
                .expect("parent edge touches its child");
        }
        edges.reverse();
        Some(
            Path::new(self.graph, self.source, v, edges)
                .expect("parent edges chain by construction"),
        )
    }
}

/// Dijkstra's algorithm from `source` under the edge weight function
/// `weight`.
///
/// # Arguments
/// * `graph`: a directed or undirected graph.
/// * `source`: the start vertex.
/// * `weight`: non-negative weight per edge index.
///
/// # Returns
/// * [`ShortestPathTree`]: distances and reconstructible paths.
///
/// # Complexity
/// * Time complexity: **O((|V| + |E|) log |V|)**.
/// * Auxiliary space: **O(|V| + |E|)**.
pub fn dijkstra<'a>(
    graph: &'a IndexGraph,
    source: usize,
    mut weight: impl FnMut(usize) -> f64,
) -> Result<ShortestPathTree<'a>> {
    let n = graph.vertex_count();
    if source >= n {
        return Err(GraphError::NoSuchVertex(source.to_string()));
    }
    let mut dist = vec![f64::INFINITY; n];
    let mut parent_edge = vec![usize::MAX; n];
    let mut done = vec![false; n];
    let mut heap = BinaryHeap::new();
    dist[source] = 0.0;
    heap.push(MinScored(0.0, source));
    while let Some(MinScored(d, v)) = heap.pop() {
        if done[v] {
            continue;
        }
        done[v] = true;
        for &e in graph.out_edges(v) {
            let w = weight(e);
            debug_assert!(w >= 0.0, "dijkstra requires non-negative weights");
            let next = graph.edge_endpoint(e, v)?;
            let candidate = d + w;
            if candidate < dist[next] {
                dist[next] = candidate;
                parent_edge[next] = e;
                heap.push(MinScored(candidate, next));
            }
        }
    }
    Ok(ShortestPathTree {
        graph,
        source,
        dist,
        parent_edge,
    })
}

/// The full `|V| x |V|` shortest-path distance table.
#[derive(Debug, Clone)]
pub struct AllPairsDistances {
    dist: Vec<Vec<f64>>,
}

impl AllPairsDistances {
    /// Distance from `u` to `v`; `f64::INFINITY` when unreachable.
    ///
    /// **Panics** if either vertex is out of bounds.
    pub fn distance(&self, u: usize, v: usize) -> f64 {
        self.dist[u][v]
    }

    pub fn vertex_count(&self) -> usize {
        self.dist.len()
    }

    pub fn row(&self, u: usize) -> &[f64] {
        &self.dist[u]
    }
}

/// All-pairs shortest paths by running Dijkstra from every vertex.
///
/// # Complexity
/// * Time complexity: **O(|V| (|V| + |E|) log |V|)**.
/// * Auxiliary space: **O(|V|²)**.
pub fn all_pairs_distances(
    graph: &IndexGraph,
    mut weight: impl FnMut(usize) -> f64,
) -> Result<AllPairsDistances> {
    let mut dist = Vec::with_capacity(graph.vertex_count());
    for v in graph.vertices() {
        let tree = dijkstra(graph, v, &mut weight)?;
        dist.push(tree.dist);
    }
    Ok(AllPairsDistances { dist })
}

/// Labelled façade over [`dijkstra`]: distances keyed by vertex identifier.
pub fn dijkstra_labelled<V: Id, E: Id>(
    graph: &LabelledGraph<V, E>,
    source: &V,
    mut weight: impl FnMut(&E) -> f64,
) -> Result<Vec<(V, f64)>> {
    let s = graph.vertex_index(source)?;
    let tree = dijkstra(graph.index_graph(), s, |e| weight(graph.edge_id(e)))?;
    Ok(graph
        .index_graph()
        .vertices()
        .map(|v| (graph.vertex_id(v).clone(), tree.distance(v)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index_graph::GraphHints;

    #[test]
    fn dijkstra_picks_cheaper_detour() {
        let mut g = IndexGraph::new_directed(GraphHints::default());
        g.add_vertices(4);
        let direct = g.add_edge(0, 3).unwrap();
        let a = g.add_edge(0, 1).unwrap();
        let b = g.add_edge(1, 2).unwrap();
        let c = g.add_edge(2, 3).unwrap();
        let w = move |e: usize| if e == direct { 10.0 } else { 1.0 };
        let tree = dijkstra(&g, 0, w).unwrap();
        assert_eq!(tree.distance(3), 3.0);
        assert_eq!(tree.path(3).unwrap().edges(), &[a, b, c]);
    }

    #[test]
    fn unreachable_is_infinite() {
        let mut g = IndexGraph::new_directed(GraphHints::default());
        g.add_vertices(3);
        g.add_edge(0, 1).unwrap();
        let tree = dijkstra(&g, 0, |_| 1.0).unwrap();
        assert!(tree.distance(2).is_infinite());
        assert!(tree.path(2).is_none());
        assert_eq!(tree.distance(0), 0.0);
        assert!(tree.path(0).unwrap().is_empty());
    }

    #[test]
    fn all_pairs_on_a_line() {
        let mut g = IndexGraph::new_undirected(GraphHints::default());
        g.add_vertices(4);
        for v in 1..4 {
            g.add_edge(v - 1, v).unwrap();
        }
        let table = all_pairs_distances(&g, |_| 1.0).unwrap();
        assert_eq!(table.distance(0, 3), 3.0);
        assert_eq!(table.distance(3, 1), 2.0);
        assert_eq!(table.distance(2, 2), 0.0);
    }
}
