//! Johnson's enumeration of elementary cycles.

use fixedbitset::FixedBitSet;

use super::check_enumerable;
use crate::algo::connectivity::tarjan_scc;
use crate::error::Result;
use crate::index_graph::IndexGraph;
use crate::path::Path;

/// Enumerate the elementary cycles of a directed graph with Johnson's
/// algorithm.
///
/// Same contract as [`crate::algo::cycles::tarjan_cycles`]: a lazy
/// iterator yielding each cycle exactly once as a [`Path`] rooted at its
/// minimum-index vertex. The search from each root explores only the
/// strongly connected component of the root within the subgraph of
/// not-smaller vertices, and the blocking sets keep a vertex out of the
/// search until unblocking it could possibly lead to a new cycle.
///
/// # Example
/// ```
/// use ixgraph::{GraphHints, IndexGraph};
/// use ixgraph::algo::cycles::johnson_cycles;
///
/// let mut g = IndexGraph::new_directed(GraphHints::default());
/// g.add_vertices(3);
/// for (u, v) in [(0, 1), (1, 2), (2, 0), (1, 0)] {
///     g.add_edge(u, v).unwrap();
/// }
/// let cycles: Vec<_> = johnson_cycles(&g).unwrap().collect();
/// assert_eq!(cycles.len(), 2);
/// ```
pub fn johnson_cycles(graph: &IndexGraph) -> Result<JohnsonCycles<'_>> {
    check_enumerable(graph)?;
    let n = graph.vertex_count();
    let mut iter = JohnsonCycles {
        graph,
        start: 0,
        scc_mask: FixedBitSet::with_capacity(n),
        blocked: FixedBitSet::with_capacity(n),
        block_map: vec![Vec::new(); n],
        frames: Vec::new(),
        path_edges: Vec::new(),
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

/// Lazy iterator over elementary cycles; see [`johnson_cycles`].
#[derive(Debug)]
pub struct JohnsonCycles<'a> {
    graph: &'a IndexGraph,
    start: usize,
    // the root's strongly connected component among vertices >= start
    scc_mask: FixedBitSet,
    blocked: FixedBitSet,
    // block_map[w] lists the vertices to unblock when w unblocks
    block_map: Vec<Vec<usize>>,
    frames: Vec<Frame>,
    path_edges: Vec<usize>,
}

impl JohnsonCycles<'_> {
    fn enter_root(&mut self, root: usize) {
        let n = self.graph.vertex_count();
        self.start = root;
        let mut remaining = FixedBitSet::with_capacity(n);
        remaining.insert_range(root..n);
        let (comp, _) = tarjan_scc(self.graph, Some(&remaining));
        self.scc_mask.clear();
        for v in root..n {
            if comp[v] == comp[root] {
                self.scc_mask.insert(v);
            }
        }
        self.blocked.clear();
        self.blocked.insert(root);
        for list in &mut self.block_map {
            list.clear();
        }
        self.path_edges.clear();
        self.frames.push(Frame {
            v: root,
            next: 0,
            found: false,
        });
    }

    fn unblock(&mut self, v: usize) {
        let mut pending = vec![v];
        while let Some(u) = pending.pop() {
            if !self.blocked.contains(u) {
                continue;
            }
            self.blocked.set(u, false);
            pending.append(&mut self.block_map[u]);
        }
    }
}

impl<'a> Iterator for JohnsonCycles<'a> {
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
                if !self.scc_mask.contains(w) {
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
                if !self.blocked.put(w) {
                    self.path_edges.push(e);
                    self.frames.push(Frame {
                        v: w,
                        next: 0,
                        found: false,
                    });
                }
                continue;
            }

            let popped = self.frames.pop().expect("frame present");
            if popped.found {
                self.unblock(popped.v);
            } else {
                // stay blocked until an out-neighbor unblocks
                for i in 0..graph.out_edges(popped.v).len() {
                    let w = graph.edge_target(graph.out_edges(popped.v)[i]);
                    if self.scc_mask.contains(w) && !self.block_map[w].contains(&popped.v) {
                        self.block_map[w].push(popped.v);
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
