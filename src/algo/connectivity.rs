//! Connected and strongly connected components, reported as vertex
//! partitions.

use fixedbitset::FixedBitSet;

use crate::error::{GraphError, Result};
use crate::index_graph::IndexGraph;
use crate::partition::VertexPartition;
use crate::unionfind::UnionFind;

/// The weakly connected components of a graph, one partition block per
/// component. Edge direction is ignored.
///
/// # Complexity
/// * Time complexity: amortized **O(|V| + |E|)**.
/// * Auxiliary space: **O(|V|)**.
pub fn connected_components(graph: &IndexGraph) -> Result<VertexPartition<'_>> {
    let mut uf = UnionFind::new(graph.vertex_count());
    for e in graph.edges() {
        let (s, t) = graph.edge_endpoints(e);
        uf.union(s, t);
    }
    let (labels, _) = uf.into_labeling();
    VertexPartition::new(graph, labels)
}

/// The strongly connected components of a directed graph, one partition
/// block per component, numbered in reverse topological order.
///
/// Uses Tarjan's algorithm with an explicit frame stack.
///
/// # Complexity
/// * Time complexity: **O(|V| + |E|)**.
/// * Auxiliary space: **O(|V|)**.
pub fn strongly_connected_components(graph: &IndexGraph) -> Result<VertexPartition<'_>> {
    if !graph.is_directed() {
        return Err(GraphError::UndirectedGraphRejected);
    }
    let (comp, _) = tarjan_scc(graph, None);
    VertexPartition::new(graph, comp)
}

const UNVISITED: usize = usize::MAX;

struct Frame {
    v: usize,
    edge_pos: usize,
}

/// Tarjan's strongly-connected-components sweep, optionally restricted to
/// the vertices of `active`. Inactive vertices keep the `usize::MAX`
/// component label.
pub(crate) fn tarjan_scc(graph: &IndexGraph, active: Option<&FixedBitSet>) -> (Vec<usize>, usize) {
    debug_assert!(graph.is_directed());
    let n = graph.vertex_count();
    let is_active = |v: usize| active.map_or(true, |mask| mask.contains(v));
    let mut index = vec![UNVISITED; n];
    let mut lowlink = vec![0usize; n];
    let mut comp = vec![UNVISITED; n];
    let mut on_stack = FixedBitSet::with_capacity(n);
    let mut stack: Vec<usize> = Vec::new();
    let mut frames: Vec<Frame> = Vec::new();
    let mut next_index = 0usize;
    let mut comp_count = 0usize;

    for start in 0..n {
        if !is_active(start) || index[start] != UNVISITED {
            continue;
        }
        index[start] = next_index;
        lowlink[start] = next_index;
        next_index += 1;
        stack.push(start);
        on_stack.insert(start);
        frames.push(Frame { v: start, edge_pos: 0 });

        while let Some(frame) = frames.last_mut() {
            let v = frame.v;
            if frame.edge_pos < graph.out_edges(v).len() {
                let e = graph.out_edges(v)[frame.edge_pos];
                frame.edge_pos += 1;
                let w = graph.edge_target(e);
                if !is_active(w) {
                    continue;
                }
                if index[w] == UNVISITED {
                    index[w] = next_index;
                    lowlink[w] = next_index;
                    next_index += 1;
                    stack.push(w);
                    on_stack.insert(w);
                    frames.push(Frame { v: w, edge_pos: 0 });
                } else if on_stack.contains(w) {
                    lowlink[v] = lowlink[v].min(index[w]);
                }
            } else {
                frames.pop();
                if lowlink[v] == index[v] {
                    loop {
                        let w = stack.pop().expect("component member on stack");
                        on_stack.set(w, false);
                        comp[w] = comp_count;
                        if w == v {
                            break;
                        }
                    }
                    comp_count += 1;
                }
                if let Some(parent) = frames.last_mut() {
                    lowlink[parent.v] = lowlink[parent.v].min(lowlink[v]);
                }
            }
        }
    }
    (comp, comp_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index_graph::GraphHints;

    #[test]
    fn weak_components_ignore_direction() {
        let mut g = IndexGraph::new_directed(GraphHints::default());
        g.add_vertices(5);
        g.add_edge(0, 1).unwrap();
        g.add_edge(2, 1).unwrap();
        g.add_edge(3, 4).unwrap();
        let p = connected_components(&g).unwrap();
        assert_eq!(p.number_of_blocks(), 2);
        assert_eq!(p.vertex_block(0), p.vertex_block(2));
        assert_ne!(p.vertex_block(0), p.vertex_block(3));
    }

    #[test]
    fn strong_components_split_one_way_links() {
        let mut g = IndexGraph::new_directed(GraphHints::default());
        g.add_vertices(5);
        // cycle 0-1-2, then a one-way bridge to the cycle 3-4
        for (u, v) in [(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 3)] {
            g.add_edge(u, v).unwrap();
        }
        let p = strongly_connected_components(&g).unwrap();
        assert_eq!(p.number_of_blocks(), 2);
        assert_eq!(p.vertex_block(0), p.vertex_block(1));
        assert_eq!(p.vertex_block(0), p.vertex_block(2));
        assert_eq!(p.vertex_block(3), p.vertex_block(4));
        assert_ne!(p.vertex_block(0), p.vertex_block(3));
        // reverse topological numbering puts the sink component first
        assert!(p.vertex_block(3) < p.vertex_block(0));
    }

    #[test]
    fn undirected_input_is_rejected() {
        let g = IndexGraph::new_undirected(GraphHints::default());
        assert_eq!(
            strongly_connected_components(&g).unwrap_err(),
            GraphError::UndirectedGraphRejected
        );
    }

    #[test]
    fn masked_sweep_skips_inactive_vertices() {
        let mut g = IndexGraph::new_directed(GraphHints::default());
        g.add_vertices(4);
        for (u, v) in [(0, 1), (1, 0), (1, 2), (2, 3), (3, 1)] {
            g.add_edge(u, v).unwrap();
        }
        let mut mask = FixedBitSet::with_capacity(4);
        mask.insert(1);
        mask.insert(2);
        mask.insert(3);
        let (comp, count) = tarjan_scc(&g, Some(&mask));
        assert_eq!(count, 1);
        assert_eq!(comp[0], usize::MAX);
        assert_eq!(comp[1], comp[2]);
        assert_eq!(comp[2], comp[3]);
    }
}
