//! Walks through a graph: the [`Path`] shape returned by the path-producing
//! algorithms, plus breadth-first pathfinding and reachability.

use std::collections::VecDeque;

use fixedbitset::FixedBitSet;

use crate::error::{GraphError, Result};
use crate::index_graph::IndexGraph;
use crate::mapping::Id;
use crate::LabelledGraph;

/// An ordered edge walk through a specific graph instance, from `source` to
/// `target`.
///
/// The edge list is validated at construction: each edge must touch the
/// vertex the walk has reached so far (for undirected edges, the next vertex
/// is the endpoint that is not the previous one). A walk whose edges do not
/// chain is rejected with [`GraphError::MalformedPath`], so every existing
/// `Path` can enumerate its vertices infallibly.
///
/// A path with `source == target` is a cycle. The degenerate cycle of zero
/// edges represents an isolated vertex and is the only cycle that is also
/// simple.
#[derive(Clone)]
pub struct Path<'a> {
    graph: &'a IndexGraph,
    source: usize,
    target: usize,
    edges: Vec<usize>,
}

impl<'a> Path<'a> {
    /// Build a path from `source` over `edges`, checking that the edges
    /// chain and that they end at `target`.
    pub fn new(graph: &'a IndexGraph, source: usize, target: usize, edges: Vec<usize>) -> Result<Self> {
        let mut at = source;
        for &e in &edges {
            if e >= graph.edge_count() {
                return Err(GraphError::NoSuchEdge(e.to_string()));
            }
            at = Self::step(graph, e, at)?;
        }
        if at != target {
            return Err(GraphError::MalformedPath {
                edge: *edges.last().unwrap_or(&usize::MAX),
                vertex: target,
            });
        }
        Ok(Path {
            graph,
            source,
            target,
            edges,
        })
    }

    fn step(graph: &IndexGraph, e: usize, at: usize) -> Result<usize> {
        let (s, t) = graph.edge_endpoints(e);
        if graph.is_directed() {
            if s != at {
                return Err(GraphError::MalformedPath { edge: e, vertex: at });
            }
            Ok(t)
        } else if s == at {
            Ok(t)
        } else if t == at {
            Ok(s)
        } else {
            Err(GraphError::MalformedPath { edge: e, vertex: at })
        }
    }

    pub fn graph(&self) -> &'a IndexGraph {
        self.graph
    }

    pub fn source(&self) -> usize {
        self.source
    }

    pub fn target(&self) -> usize {
        self.target
    }

    /// The edges of the walk, in traversal order.
    pub fn edges(&self) -> &[usize] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// `true` iff the walk starts and ends on the same vertex.
    pub fn is_cycle(&self) -> bool {
        self.source == self.target
    }

    /// `true` iff no vertex repeats. A cycle repeats its root by definition
    /// and is not simple, except the zero-edge isolated-vertex cycle.
    pub fn is_simple(&self) -> bool {
        if self.is_cycle() {
            return self.edges.is_empty();
        }
        let mut seen = FixedBitSet::with_capacity(self.graph.vertex_count());
        for v in self.vertices() {
            if seen.put(v) {
                return false;
            }
        }
        true
    }

    /// The vertices along the walk, starting at `source`. One longer than
    /// the edge list, except for the zero-edge cycle where it is `[source]`.
    pub fn vertices(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.edges.len() + 1);
        out.push(self.source);
        let mut at = self.source;
        for &e in &self.edges {
            at = Self::step(self.graph, e, at).expect("validated at construction");
            out.push(at);
        }
        if self.is_cycle() && !self.edges.is_empty() {
            out.pop();
        }
        out
    }

    /// Total weight of the walk under `weight`.
    pub fn weight_with(&self, mut weight: impl FnMut(usize) -> f64) -> f64 {
        self.edges.iter().map(|&e| weight(e)).sum()
    }

    /// The sub-walk spanning positions `i..j` of the vertex sequence; for
    /// `i == j`, the zero-edge path rooted at vertex position `i`.
    ///
    /// **Panics** if `i > j` or `j > len()`.
    pub fn sub_path(&self, i: usize, j: usize) -> Path<'a> {
        assert!(i <= j && j <= self.edges.len(), "sub-path range out of bounds");
        let vertices = self.walk_positions();
        Path {
            graph: self.graph,
            source: vertices[i],
            target: vertices[j],
            edges: self.edges[i..j].to_vec(),
        }
    }

    // vertex at every walk position, cycles included (length == edges + 1)
    fn walk_positions(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.edges.len() + 1);
        let mut at = self.source;
        out.push(at);
        for &e in &self.edges {
            at = Self::step(self.graph, e, at).expect("validated at construction");
            out.push(at);
        }
        out
    }
}

impl PartialEq for Path<'_> {
    /// Paths are equal iff they belong to the same graph instance, both are
    /// cycles or both are not, and their edge lists match: up to rotation
    /// for cycles, up to reversal (with swapped ends) for undirected
    /// non-cycles.
    fn eq(&self, other: &Self) -> bool {
        if !core::ptr::eq(self.graph, other.graph)
            || self.is_cycle() != other.is_cycle()
            || self.edges.len() != other.edges.len()
        {
            return false;
        }
        if self.is_cycle() {
            if self.edges.is_empty() {
                return self.source == other.source;
            }
            let n = self.edges.len();
            let rotation_match = |rev: bool| {
                (0..n).any(|shift| {
                    (0..n).all(|i| {
                        let j = if rev { (shift + n - i) % n } else { (shift + i) % n };
                        self.edges[i] == other.edges[j]
                    })
                })
            };
            rotation_match(false) || (!self.graph.is_directed() && rotation_match(true))
        } else if self.source == other.source && self.target == other.target {
            self.edges == other.edges
        } else if !self.graph.is_directed()
            && self.source == other.target
            && self.target == other.source
        {
            self.edges.iter().eq(other.edges.iter().rev())
        } else {
            false
        }
    }
}

impl Eq for Path<'_> {}

impl core::fmt::Debug for Path<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Path")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("edges", &self.edges)
            .finish()
    }
}

/// A path translated to identifier space, as returned by the labelled
/// algorithm façades.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelledPath<V, E> {
    pub source: V,
    pub target: V,
    pub vertices: Vec<V>,
    pub edges: Vec<E>,
}

impl<V: Id, E: Id> LabelledPath<V, E> {
    /// Translate an index-space path through the mappings of `graph`.
    pub fn from_index_path(graph: &LabelledGraph<V, E>, path: &Path<'_>) -> Self {
        LabelledPath {
            source: graph.vertex_id(path.source()).clone(),
            target: graph.vertex_id(path.target()).clone(),
            vertices: path.vertices().iter().map(|&v| graph.vertex_id(v).clone()).collect(),
            edges: path.edges().iter().map(|&e| graph.edge_id(e).clone()).collect(),
        }
    }
}

/// Find a shortest (by edge count) path from `source` to `target`, or
/// `None` when `target` is unreachable.
///
/// Runs a breadth-first search reconstructing the walk through a
/// parent-edge array.
///
/// # Complexity
/// * Time complexity: **O(|V| + |E|)**.
/// * Auxiliary space: **O(|V|)**.
pub fn find_path<'a>(graph: &'a IndexGraph, source: usize, target: usize) -> Result<Option<Path<'a>>> {
    let n = graph.vertex_count();
    if source >= n {
        return Err(GraphError::NoSuchVertex(source.to_string()));
    }
    if target >= n {
        return Err(GraphError::NoSuchVertex(target.to_string()));
    }
    if source == target {
        return Ok(Some(Path::new(graph, source, source, Vec::new())?));
    }
    let mut parent_edge = vec![usize::MAX; n];
    let mut discovered = FixedBitSet::with_capacity(n);
    discovered.insert(source);
    let mut queue = VecDeque::new();
    queue.push_back(source);
    while let Some(v) = queue.pop_front() {
        for &e in graph.out_edges(v) {
            let next = graph.edge_endpoint(e, v)?;
            if discovered.put(next) {
                continue;
            }
            parent_edge[next] = e;
            if next == target {
                let mut edges = Vec::new();
                let mut at = target;
                while at != source {
                    let e = parent_edge[at];
                    edges.push(e);
                    at = graph.edge_endpoint(e, at)?;
                }
                edges.reverse();
                return Ok(Some(Path::new(graph, source, target, edges)?));
            }
            queue.push_back(next);
        }
    }
    Ok(None)
}

/// Labelled façade over [`find_path`].
pub fn find_path_labelled<V: Id, E: Id>(
    graph: &LabelledGraph<V, E>,
    source: &V,
    target: &V,
) -> Result<Option<LabelledPath<V, E>>> {
    let s = graph.vertex_index(source)?;
    let t = graph.vertex_index(target)?;
    Ok(find_path(graph.index_graph(), s, t)?
        .map(|p| LabelledPath::from_index_path(graph, &p)))
}

/// The set of vertices reachable from any of `sources`, as a bitmap over
/// the vertex index space. Sources count as reachable.
pub fn reachable_vertices(
    graph: &IndexGraph,
    sources: impl IntoIterator<Item = usize>,
) -> Result<FixedBitSet> {
    let n = graph.vertex_count();
    let mut visited = FixedBitSet::with_capacity(n);
    let mut queue = VecDeque::new();
    for s in sources {
        if s >= n {
            return Err(GraphError::NoSuchVertex(s.to_string()));
        }
        if !visited.put(s) {
            queue.push_back(s);
        }
    }
    while let Some(v) = queue.pop_front() {
        for &e in graph.out_edges(v) {
            let next = graph.edge_endpoint(e, v)?;
            if !visited.put(next) {
                queue.push_back(next);
            }
        }
    }
    Ok(visited)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index_graph::GraphHints;

    fn line(n: usize, directed: bool) -> IndexGraph {
        let hints = GraphHints::default();
        let mut g = if directed {
            IndexGraph::new_directed(hints)
        } else {
            IndexGraph::new_undirected(hints)
        };
        g.add_vertices(n);
        for v in 1..n {
            g.add_edge(v - 1, v).unwrap();
        }
        g
    }

    #[test]
    fn vertices_walk_undirected_edges_both_ways() {
        let g = line(4, false);
        let p = Path::new(&g, 3, 0, vec![2, 1, 0]).unwrap();
        assert_eq!(p.vertices(), vec![3, 2, 1, 0]);
        assert!(p.is_simple());
        assert!(!p.is_cycle());
    }

    #[test]
    fn malformed_chain_is_rejected() {
        let g = line(4, false);
        let err = Path::new(&g, 0, 3, vec![0, 2]).unwrap_err();
        assert_eq!(err, GraphError::MalformedPath { edge: 2, vertex: 1 });
    }

    #[test]
    fn cycle_vertices_do_not_repeat_the_root() {
        let mut g = line(3, false);
        g.add_edge(2, 0).unwrap();
        let c = Path::new(&g, 0, 0, vec![0, 1, 2]).unwrap();
        assert!(c.is_cycle());
        assert!(!c.is_simple());
        assert_eq!(c.vertices(), vec![0, 1, 2]);
        let degenerate = Path::new(&g, 1, 1, vec![]).unwrap();
        assert!(degenerate.is_cycle());
        assert!(degenerate.is_simple());
        assert_eq!(degenerate.vertices(), vec![1]);
    }

    #[test]
    fn cycle_equality_is_rotation_invariant() {
        let mut g = line(3, false);
        g.add_edge(2, 0).unwrap();
        let a = Path::new(&g, 0, 0, vec![0, 1, 2]).unwrap();
        let b = Path::new(&g, 1, 1, vec![1, 2, 0]).unwrap();
        let reversed = Path::new(&g, 0, 0, vec![2, 1, 0]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, reversed);
    }

    #[test]
    fn undirected_path_equality_allows_reversal() {
        let g = line(4, false);
        let fwd = Path::new(&g, 0, 3, vec![0, 1, 2]).unwrap();
        let back = Path::new(&g, 3, 0, vec![2, 1, 0]).unwrap();
        assert_eq!(fwd, back);
    }

    #[test]
    fn sub_path_slices_edges() {
        let g = line(5, false);
        let p = Path::new(&g, 0, 4, vec![0, 1, 2, 3]).unwrap();
        let mid = p.sub_path(1, 3);
        assert_eq!(mid.source(), 1);
        assert_eq!(mid.target(), 3);
        assert_eq!(mid.edges(), &[1, 2]);
        let point = p.sub_path(2, 2);
        assert!(point.is_cycle() && point.is_empty());
    }

    #[test]
    fn find_path_breadth_first() {
        let mut g = IndexGraph::new_undirected(GraphHints::default());
        g.add_vertices(4);
        let _ab = g.add_edge(0, 1).unwrap();
        let ac = g.add_edge(0, 2).unwrap();
        let _bc = g.add_edge(1, 2).unwrap();
        let cd = g.add_edge(2, 3).unwrap();
        let p = find_path(&g, 0, 3).unwrap().unwrap();
        assert_eq!(p.edges(), &[ac, cd]);
        assert_eq!(p.vertices(), vec![0, 2, 3]);
    }

    #[test]
    fn find_path_unreachable_is_none() {
        let mut g = line(3, true);
        g.add_vertex();
        assert!(find_path(&g, 0, 3).unwrap().is_none());
        // directed edges only go forward
        assert!(find_path(&g, 2, 0).unwrap().is_none());
        assert!(find_path(&g, 0, 2).unwrap().is_some());
    }

    #[test]
    fn reachability_is_multi_source() {
        let mut g = line(3, true);
        g.add_vertex();
        g.add_vertex();
        g.add_edge(3, 4).unwrap();
        let r = reachable_vertices(&g, [1, 3]).unwrap();
        let got: Vec<usize> = r.ones().collect();
        assert_eq!(got, vec![1, 2, 3, 4]);
    }
}
