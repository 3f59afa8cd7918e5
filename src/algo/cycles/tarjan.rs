//! Tarjan's enumeration of elementary cycles.

use fixedbitset::FixedBitSet;

use super::check_enumerable;
use crate::error::Result;
use crate::index_graph::IndexGraph;
use crate::path::Path;

/// Enumerate the elementary cycles of a directed graph with Tarjan's
/// backtracking algorithm.
///
/// The returned iterator is lazy: it advances the search only on `next`.
/// Each cycle is yielded exactly once, as a [`Path`] rooted at the cycle's
/// minimum-index vertex. Parallel edges are rejected with
/// [`crate::GraphError::ParallelEdgesRejected`], undirected graphs with
/// [`crate::GraphError::UndirectedGraphRejected`].
///
/// # Example
/// ```
/// use ixgraph::{GraphHints, IndexGraph};
/// use ixgraph::algo::cycles::tarjan_cycles;
///
/// let mut g = IndexGraph::new_directed(GraphHints::default());
/// g.add_vertices(3);
/// for (u, v) in [(0, 1), (1, 2), (2, 0), (1, 0)] {
///     g.add_edge(u, v).unwrap();
/// }
/// let cycles: Vec<_> = tarjan_cycles(&g).unwrap().collect();
/// assert_eq!(cycles.len(), 2);
/// ```
pub fn tarjan_cycles(graph: &IndexGraph) -> Result<TarjanCycles<'_>> {
    check_enumerable(graph)?;
    let n = graph.vertex_count();
    let mut iter = TarjanCycles {
        graph,
        start: 0,
        frames: Vec::new(),
        path_edges: Vec::new(),
        marked: FixedBitSet::with_capacity(n),
        marked_stack: Vec::new(),
    };
    if n > 0 {
        iter.enter_root(0);
    }
    Ok(iter)
}

#[derive(Debug)]
struct Frame {
    v: usize,
    next: usize,
    // a descendant of this frame closed a cycle
    found: bool,
}

/// Lazy iterator over elementary cycles; see [`tarjan_cycles`].
#[derive(Debug)]
pub struct TarjanCycles<'a> {
    graph: &'a IndexGraph,
    start: usize,
    frames: Vec<Frame>,
    path_edges: Vec<usize>,
    marked: FixedBitSet,
    marked_stack: Vec<usize>,
}

impl TarjanCycles<'_> {
    fn enter_root(&mut self, root: usize) {
        self.start = root;
        self.marked.clear();
        self.marked.insert(root);
        self.marked_stack.clear();
        self.marked_stack.push(root);
        self.path_edges.clear();
        self.frames.push(Frame {
            v: root,
            next: 0,
            found: false,
        });
    }
}

impl<'a> Iterator for TarjanCycles<'a> {
    type Item = Path<'a>;

    fn next(&mut self) -> Option<Path<'a>> {
        let graph = self.graph;
        loop {
            let frame = self.frames.last_mut()?;
            let v = frame.v;
            if frame.next < graph.out_edges(v).len() {
                let e = graph.out_edges(v)[frame.next];
                frame.next += 1;
                let w = graph.edge_target(e);
                // only vertices >= start participate, rooting every cycle
                // at its minimum vertex
                if w < self.start {
                    continue;
                }
                if w == self.start {
                    frame.found = true;
                    let mut edges = self.path_edges.clone();
                    edges.push(e);
                    let cycle = Path::new(graph, self.start, self.start, edges)
                        .expect("cycle edges chain by construction");
                    return Some(cycle);
                }
                if !self.marked.put(w) {
                    self.marked_stack.push(w);
                    self.path_edges.push(e);
                    self.frames.push(Frame {
                        v: w,
                        next: 0,
                        found: false,
                    });
                }
                continue;
            }

            // branch exhausted; unmark above the branch point only if a
            // cycle was closed below it
            let popped = self.frames.pop().expect("frame present");
            if popped.found {
                while let Some(u) = self.marked_stack.pop() {
                    self.marked.set(u, false);
                    if u == popped.v {
                        break;
                    }
                }
            }
            match self.frames.last_mut() {
                Some(parent) => {
                    parent.found |= popped.found;
                    self.path_edges.pop();
                }
                None => {
                    let next_root = self.start + 1;
                    if next_root >= graph.vertex_count() {
                        return None;
                    }
                    self.enter_root(next_root);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;
    use crate::index_graph::GraphHints;

    fn directed(n: usize, edges: &[(usize, usize)]) -> IndexGraph {
        let mut g = IndexGraph::new_directed(GraphHints {
            allow_self_loops: true,
            ..GraphHints::default()
        });
        g.add_vertices(n);
        for &(u, v) in edges {
            g.add_edge(u, v).unwrap();
        }
        g
    }

    #[test]
    fn triangle_both_orientations() {
        let g = directed(3, &[(0, 1), (1, 2), (2, 0), (0, 2), (2, 1), (1, 0)]);
        let mut cycles: Vec<Vec<usize>> =
            tarjan_cycles(&g).unwrap().map(|p| {
                let mut e = p.edges().to_vec();
                e.sort_unstable();
                e
            }).collect();
        cycles.sort();
        // three 2-cycles plus the two directed triangles
        assert_eq!(
            cycles,
            vec![
                vec![0, 1, 2],
                vec![0, 5],
                vec![1, 4],
                vec![2, 3],
                vec![3, 4, 5],
            ]
        );
    }

    #[test]
    fn cycles_are_rooted_at_their_minimum_vertex() {
        let g = directed(4, &[(1, 2), (2, 3), (3, 1)]);
        let cycles: Vec<_> = tarjan_cycles(&g).unwrap().collect();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].source(), 1);
        assert!(cycles[0].is_cycle());
        assert_eq!(cycles[0].edges(), &[0, 1, 2]);
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let g = directed(2, &[(0, 0), (0, 1)]);
        let cycles: Vec<_> = tarjan_cycles(&g).unwrap().collect();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].edges(), &[0]);
    }

    #[test]
    fn acyclic_graph_yields_nothing() {
        let g = directed(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        assert_eq!(tarjan_cycles(&g).unwrap().count(), 0);
    }

    #[test]
    fn parallel_edges_are_rejected() {
        let g = directed(2, &[(0, 1), (0, 1)]);
        assert!(matches!(
            tarjan_cycles(&g).unwrap_err(),
            GraphError::ParallelEdgesRejected { .. }
        ));
    }

    #[test]
    fn overlapping_cycles_all_found() {
        // 0 -> 1 -> 2 -> 0 and 0 -> 1 -> 0 sharing an edge
        let g = directed(3, &[(0, 1), (1, 2), (2, 0), (1, 0)]);
        let cycles: Vec<_> = tarjan_cycles(&g).unwrap().collect();
        assert_eq!(cycles.len(), 2);
        for c in &cycles {
            assert_eq!(c.source(), 0);
            assert!(c.is_cycle());
        }
    }
}
