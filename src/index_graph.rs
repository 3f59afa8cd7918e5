//! The dense index graph: the canonical representation every algorithm in
//! this crate runs on.
//!
//! Vertices occupy the compact range `0..vertex_count()` and edges the range
//! `0..edge_count()`. Removal swaps the removed index with the last one and
//! shrinks the range, so neither space ever has holes. Weight columns
//! registered on the graph are renumbered in lockstep.

use core::fmt;

use indexmap::IndexMap;

use crate::error::{GraphError, Result};
use crate::weights::{Weights, WeightsColumn};

/// Construction hints for a new graph.
///
/// `expected_vertices` / `expected_edges` pre-size the internal storage;
/// the policy flags are immutable for the life of the graph.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphHints {
    pub expected_vertices: usize,
    pub expected_edges: usize,
    pub allow_self_loops: bool,
    pub allow_parallel_edges: bool,
}

/// A graph over dense integer vertex and edge indices.
///
/// Directedness and the self-loop / parallel-edge policies are declared at
/// construction and never change. For undirected graphs `out_edges` and
/// `in_edges` both name the incident-edge set.
///
/// # Example
/// ```
/// use ixgraph::{GraphHints, IndexGraph};
///
/// let mut g = IndexGraph::new_undirected(GraphHints::default());
/// let a = g.add_vertex();
/// let b = g.add_vertex();
/// let e = g.add_edge(a, b).unwrap();
/// assert_eq!(g.edge_endpoint(e, a).unwrap(), b);
/// assert!(g.contains_edge(b, a));
/// ```
pub struct IndexGraph {
    directed: bool,
    allow_self_loops: bool,
    allow_parallel_edges: bool,
    endpoints: Vec<(usize, usize)>,
    // per-vertex outgoing (directed) or incident (undirected) edge lists
    out: Vec<Vec<usize>>,
    // per-vertex incoming edge lists; unused for undirected graphs
    inc: Vec<Vec<usize>>,
    vertex_weights: IndexMap<String, Box<dyn WeightsColumn>>,
    edge_weights: IndexMap<String, Box<dyn WeightsColumn>>,
}

impl IndexGraph {
    pub fn new_undirected(hints: GraphHints) -> Self {
        Self::with_directedness(false, hints)
    }

    pub fn new_directed(hints: GraphHints) -> Self {
        Self::with_directedness(true, hints)
    }

    fn with_directedness(directed: bool, hints: GraphHints) -> Self {
        IndexGraph {
            directed,
            allow_self_loops: hints.allow_self_loops,
            allow_parallel_edges: hints.allow_parallel_edges,
            endpoints: Vec::with_capacity(hints.expected_edges),
            out: Vec::with_capacity(hints.expected_vertices),
            inc: Vec::with_capacity(if directed { hints.expected_vertices } else { 0 }),
            vertex_weights: IndexMap::new(),
            edge_weights: IndexMap::new(),
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn allows_self_loops(&self) -> bool {
        self.allow_self_loops
    }

    pub fn allows_parallel_edges(&self) -> bool {
        self.allow_parallel_edges
    }

    pub fn vertex_count(&self) -> usize {
        self.out.len()
    }

    pub fn edge_count(&self) -> usize {
        self.endpoints.len()
    }

    /// The vertex index range `0..vertex_count()`.
    pub fn vertices(&self) -> core::ops::Range<usize> {
        0..self.vertex_count()
    }

    /// The edge index range `0..edge_count()`.
    pub fn edges(&self) -> core::ops::Range<usize> {
        0..self.edge_count()
    }

    /// Append a new vertex, returning its index (the new `vertex_count() - 1`).
    pub fn add_vertex(&mut self) -> usize {
        let v = self.out.len();
        self.out.push(Vec::new());
        if self.directed {
            self.inc.push(Vec::new());
        }
        for column in self.vertex_weights.values_mut() {
            column.push_default();
        }
        v
    }

    /// Append `count` new vertices, returning the index of the first.
    pub fn add_vertices(&mut self, count: usize) -> usize {
        let first = self.vertex_count();
        for _ in 0..count {
            self.add_vertex();
        }
        first
    }

    /// Insert an edge from `source` to `target`, returning its index.
    ///
    /// Fails with [`GraphError::SelfLoopForbidden`] or
    /// [`GraphError::ParallelEdgeForbidden`] when the graph's declared
    /// policies reject the insertion, and with [`GraphError::NoSuchVertex`]
    /// when either endpoint is out of range.
    pub fn add_edge(&mut self, source: usize, target: usize) -> Result<usize> {
        self.check_vertex(source)?;
        self.check_vertex(target)?;
        if source == target && !self.allow_self_loops {
            return Err(GraphError::SelfLoopForbidden(source));
        }
        if !self.allow_parallel_edges && self.find_edge(source, target).is_some() {
            return Err(GraphError::ParallelEdgeForbidden { u: source, v: target });
        }
        let e = self.endpoints.len();
        self.endpoints.push((source, target));
        self.attach(e);
        for column in self.edge_weights.values_mut() {
            column.push_default();
        }
        Ok(e)
    }

    /// Remove edge `e`, swap-removing it in the edge index space: the former
    /// last edge takes index `e`.
    pub fn remove_edge(&mut self, e: usize) -> Result<()> {
        self.check_edge(e)?;
        self.detach(e);
        let last = self.endpoints.len() - 1;
        if e != last {
            self.detach(last);
            self.endpoints[e] = self.endpoints[last];
            self.attach(e);
        }
        self.endpoints.pop();
        for column in self.edge_weights.values_mut() {
            column.swap_remove(e);
        }
        Ok(())
    }

    /// Remove vertex `v` along with every incident edge; the former last
    /// vertex takes index `v`.
    pub fn remove_vertex(&mut self, v: usize) -> Result<()> {
        self.check_vertex(v)?;
        while let Some(&e) = self.out[v].last() {
            self.remove_edge(e)?;
        }
        if self.directed {
            while let Some(&e) = self.inc[v].last() {
                self.remove_edge(e)?;
            }
        }
        let last = self.out.len() - 1;
        if v != last {
            // repoint every edge that referenced the swapped-in vertex
            let refs: Vec<usize> = if self.directed {
                self.out[last].iter().chain(self.inc[last].iter()).copied().collect()
            } else {
                self.out[last].clone()
            };
            for e in refs {
                let (s, t) = self.endpoints[e];
                self.endpoints[e] = (
                    if s == last { v } else { s },
                    if t == last { v } else { t },
                );
            }
        }
        self.out.swap_remove(v);
        if self.directed {
            self.inc.swap_remove(v);
        }
        for column in self.vertex_weights.values_mut() {
            column.swap_remove(v);
        }
        Ok(())
    }

    /// Change the endpoints of edge `e` in place, preserving its index.
    pub fn move_edge(&mut self, e: usize, source: usize, target: usize) -> Result<()> {
        self.check_edge(e)?;
        self.check_vertex(source)?;
        self.check_vertex(target)?;
        if source == target && !self.allow_self_loops {
            return Err(GraphError::SelfLoopForbidden(source));
        }
        if !self.allow_parallel_edges {
            if let Some(other) = self.find_edge(source, target) {
                if other != e {
                    return Err(GraphError::ParallelEdgeForbidden { u: source, v: target });
                }
            }
        }
        self.detach(e);
        self.endpoints[e] = (source, target);
        self.attach(e);
        Ok(())
    }

    /// Remove all vertices and edges. Registered weight columns stay
    /// registered but are emptied.
    pub fn clear(&mut self) {
        self.endpoints.clear();
        self.out.clear();
        self.inc.clear();
        for column in self.vertex_weights.values_mut() {
            column.clear();
        }
        for column in self.edge_weights.values_mut() {
            column.clear();
        }
    }

    /// Remove all edges, keeping the vertices.
    pub fn clear_edges(&mut self) {
        self.endpoints.clear();
        for list in &mut self.out {
            list.clear();
        }
        for list in &mut self.inc {
            list.clear();
        }
        for column in self.edge_weights.values_mut() {
            column.clear();
        }
    }

    /// The source vertex of edge `e`.
    ///
    /// **Panics** if `e` is out of bounds.
    pub fn edge_source(&self, e: usize) -> usize {
        self.endpoints[e].0
    }

    /// The target vertex of edge `e`.
    ///
    /// **Panics** if `e` is out of bounds.
    pub fn edge_target(&self, e: usize) -> usize {
        self.endpoints[e].1
    }

    /// Both endpoints of edge `e` as `(source, target)`.
    ///
    /// **Panics** if `e` is out of bounds.
    pub fn edge_endpoints(&self, e: usize) -> (usize, usize) {
        self.endpoints[e]
    }

    /// The endpoint of `e` other than `v`; for a self-loop on `v`, `v`
    /// itself. Fails when `v` is on neither side of `e`.
    pub fn edge_endpoint(&self, e: usize, v: usize) -> Result<usize> {
        self.check_edge(e)?;
        let (s, t) = self.endpoints[e];
        if v == s {
            Ok(t)
        } else if v == t {
            Ok(s)
        } else {
            Err(GraphError::NoSuchVertex(v.to_string()))
        }
    }

    /// The edges leaving `v` (directed), or all edges incident to `v`
    /// (undirected). Iteration order is deterministic for a fixed graph
    /// state but unstable across structural edits.
    ///
    /// **Panics** if `v` is out of bounds.
    pub fn out_edges(&self, v: usize) -> &[usize] {
        &self.out[v]
    }

    /// The edges entering `v`; mirrors [`IndexGraph::out_edges`] for
    /// undirected graphs.
    ///
    /// **Panics** if `v` is out of bounds.
    pub fn in_edges(&self, v: usize) -> &[usize] {
        if self.directed {
            &self.inc[v]
        } else {
            &self.out[v]
        }
    }

    /// Out-degree of `v` (incident degree for undirected graphs).
    pub fn out_degree(&self, v: usize) -> usize {
        self.out[v].len()
    }

    pub fn in_degree(&self, v: usize) -> usize {
        self.in_edges(v).len()
    }

    /// Whether an edge `source -> target` exists (in either orientation for
    /// undirected graphs). Runs in O(deg) of the sparser endpoint.
    ///
    /// **Panics** if either vertex is out of bounds.
    pub fn contains_edge(&self, source: usize, target: usize) -> bool {
        self.find_edge(source, target).is_some()
    }

    /// The index of an edge `source -> target` if one exists.
    ///
    /// **Panics** if either vertex is out of bounds.
    pub fn find_edge(&self, source: usize, target: usize) -> Option<usize> {
        if self.directed {
            if self.out[source].len() <= self.inc[target].len() {
                self.out[source]
                    .iter()
                    .copied()
                    .find(|&e| self.endpoints[e].1 == target)
            } else {
                self.inc[target]
                    .iter()
                    .copied()
                    .find(|&e| self.endpoints[e].0 == source)
            }
        } else {
            let (probe, other) = if self.out[source].len() <= self.out[target].len() {
                (source, target)
            } else {
                (target, source)
            };
            self.out[probe].iter().copied().find(|&e| {
                let (s, t) = self.endpoints[e];
                (s == probe && t == other) || (t == probe && s == other)
            })
        }
    }

    fn attach(&mut self, e: usize) {
        let (s, t) = self.endpoints[e];
        self.out[s].push(e);
        if self.directed {
            self.inc[t].push(e);
        } else if t != s {
            self.out[t].push(e);
        }
    }

    fn detach(&mut self, e: usize) {
        let (s, t) = self.endpoints[e];
        Self::unlist(&mut self.out[s], e);
        if self.directed {
            Self::unlist(&mut self.inc[t], e);
        } else if t != s {
            Self::unlist(&mut self.out[t], e);
        }
    }

    fn unlist(list: &mut Vec<usize>, e: usize) {
        let pos = list.iter().position(|&x| x == e).expect("edge missing from adjacency list");
        list.swap_remove(pos);
    }

    fn check_vertex(&self, v: usize) -> Result<()> {
        if v < self.out.len() {
            Ok(())
        } else {
            Err(GraphError::NoSuchVertex(v.to_string()))
        }
    }

    fn check_edge(&self, e: usize) -> Result<()> {
        if e < self.endpoints.len() {
            Ok(())
        } else {
            Err(GraphError::NoSuchEdge(e.to_string()))
        }
    }
}

/// Weight-column registry.
impl IndexGraph {
    /// Register a per-vertex weight column under `key`, sized to the current
    /// vertex count with every slot at `default`.
    ///
    /// Fails with [`GraphError::DuplicateIdentifier`] when the key is taken.
    pub fn add_vertex_weights<T: Clone + 'static>(
        &mut self,
        key: impl Into<String>,
        default: T,
    ) -> Result<&mut Weights<T>> {
        let key = key.into();
        if self.vertex_weights.contains_key(&key) {
            return Err(GraphError::DuplicateIdentifier(key));
        }
        let column = Weights::new(default, self.vertex_count());
        let entry = self.vertex_weights.entry(key).or_insert(Box::new(column));
        Ok(entry.as_any_mut().downcast_mut().expect("freshly inserted column"))
    }

    /// Register a per-edge weight column under `key`.
    pub fn add_edge_weights<T: Clone + 'static>(
        &mut self,
        key: impl Into<String>,
        default: T,
    ) -> Result<&mut Weights<T>> {
        let key = key.into();
        if self.edge_weights.contains_key(&key) {
            return Err(GraphError::DuplicateIdentifier(key));
        }
        let column = Weights::new(default, self.edge_count());
        let entry = self.edge_weights.entry(key).or_insert(Box::new(column));
        Ok(entry.as_any_mut().downcast_mut().expect("freshly inserted column"))
    }

    /// The vertex weight column registered under `key`, if it exists and
    /// holds values of type `T`.
    pub fn vertex_weights<T: 'static>(&self, key: &str) -> Option<&Weights<T>> {
        self.vertex_weights.get(key)?.as_any().downcast_ref()
    }

    pub fn vertex_weights_mut<T: 'static>(&mut self, key: &str) -> Option<&mut Weights<T>> {
        self.vertex_weights.get_mut(key)?.as_any_mut().downcast_mut()
    }

    /// The edge weight column registered under `key`, if it exists and holds
    /// values of type `T`.
    pub fn edge_weights<T: 'static>(&self, key: &str) -> Option<&Weights<T>> {
        self.edge_weights.get(key)?.as_any().downcast_ref()
    }

    pub fn edge_weights_mut<T: 'static>(&mut self, key: &str) -> Option<&mut Weights<T>> {
        self.edge_weights.get_mut(key)?.as_any_mut().downcast_mut()
    }

    /// Drop the vertex weight column under `key`; `false` if absent.
    pub fn remove_vertex_weights(&mut self, key: &str) -> bool {
        self.vertex_weights.shift_remove(key).is_some()
    }

    pub fn remove_edge_weights(&mut self, key: &str) -> bool {
        self.edge_weights.shift_remove(key).is_some()
    }

    /// The keys of the registered vertex weight columns.
    pub fn vertex_weight_keys(&self) -> impl Iterator<Item = &str> {
        self.vertex_weights.keys().map(String::as_str)
    }

    pub fn edge_weight_keys(&self) -> impl Iterator<Item = &str> {
        self.edge_weights.keys().map(String::as_str)
    }
}

impl Clone for IndexGraph {
    fn clone(&self) -> Self {
        IndexGraph {
            directed: self.directed,
            allow_self_loops: self.allow_self_loops,
            allow_parallel_edges: self.allow_parallel_edges,
            endpoints: self.endpoints.clone(),
            out: self.out.clone(),
            inc: self.inc.clone(),
            vertex_weights: self
                .vertex_weights
                .iter()
                .map(|(k, v)| (k.clone(), v.clone_column()))
                .collect(),
            edge_weights: self
                .edge_weights
                .iter()
                .map(|(k, v)| (k.clone(), v.clone_column()))
                .collect(),
        }
    }
}

impl fmt::Debug for IndexGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexGraph")
            .field("directed", &self.directed)
            .field("vertices", &self.vertex_count())
            .field("edges", &self.endpoints)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multi_hints() -> GraphHints {
        GraphHints {
            allow_self_loops: true,
            allow_parallel_edges: true,
            ..GraphHints::default()
        }
    }

    #[test]
    fn construction_round_trip_directed() {
        let mut g = IndexGraph::new_directed(GraphHints::default());
        let vs: Vec<usize> = (0..4).map(|_| g.add_vertex()).collect();
        assert_eq!(vs, vec![0, 1, 2, 3]);
        let e01 = g.add_edge(0, 1).unwrap();
        let e12 = g.add_edge(1, 2).unwrap();
        let e23 = g.add_edge(2, 3).unwrap();
        for e in g.edges() {
            assert!(g.out_edges(g.edge_source(e)).contains(&e));
            assert!(g.in_edges(g.edge_target(e)).contains(&e));
        }
        assert_eq!(g.edge_endpoint(e01, 0).unwrap(), 1);
        assert_eq!(g.edge_endpoint(e12, 2).unwrap(), 1);
        assert!(g.edge_endpoint(e23, 0).is_err());
        assert!(g.contains_edge(0, 1));
        assert!(!g.contains_edge(1, 0));
    }

    #[test]
    fn undirected_adjacency_mirrors() {
        let mut g = IndexGraph::new_undirected(GraphHints::default());
        g.add_vertices(3);
        let e = g.add_edge(0, 2).unwrap();
        assert_eq!(g.out_edges(2), &[e]);
        assert_eq!(g.in_edges(0), &[e]);
        assert!(g.contains_edge(2, 0));
    }

    #[test]
    fn policies_are_enforced() {
        let mut g = IndexGraph::new_undirected(GraphHints::default());
        g.add_vertices(2);
        assert_eq!(
            g.add_edge(0, 0).unwrap_err(),
            GraphError::SelfLoopForbidden(0)
        );
        g.add_edge(0, 1).unwrap();
        assert_eq!(
            g.add_edge(1, 0).unwrap_err(),
            GraphError::ParallelEdgeForbidden { u: 1, v: 0 }
        );

        let mut m = IndexGraph::new_undirected(multi_hints());
        m.add_vertices(2);
        m.add_edge(0, 0).unwrap();
        m.add_edge(0, 1).unwrap();
        m.add_edge(1, 0).unwrap();
        assert_eq!(m.edge_count(), 3);
    }

    #[test]
    fn remove_edge_swaps_last_in() {
        let mut g = IndexGraph::new_directed(GraphHints::default());
        g.add_vertices(4);
        let e0 = g.add_edge(0, 1).unwrap();
        let _e1 = g.add_edge(1, 2).unwrap();
        let _e2 = g.add_edge(2, 3).unwrap();
        g.remove_edge(e0).unwrap();
        assert_eq!(g.edge_count(), 2);
        // former edge 2 now occupies index 0
        assert_eq!(g.edge_endpoints(0), (2, 3));
        assert!(g.out_edges(2).contains(&0));
        assert!(g.in_edges(3).contains(&0));
        assert!(!g.contains_edge(0, 1));
    }

    #[test]
    fn remove_vertex_renumbers_endpoints() {
        let mut g = IndexGraph::new_undirected(GraphHints::default());
        g.add_vertices(4);
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 2).unwrap();
        g.add_edge(2, 3).unwrap();
        g.add_edge(3, 0).unwrap();
        g.remove_vertex(1).unwrap();
        // vertex 3 becomes vertex 1; surviving edges are (2,3)->(2,1) and (3,0)->(1,0)
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.edge_count(), 2);
        assert!(g.contains_edge(2, 1));
        assert!(g.contains_edge(1, 0));
        assert!(!g.contains_edge(0, 2));
        for e in g.edges() {
            let (s, t) = g.edge_endpoints(e);
            assert!(s < 3 && t < 3);
        }
    }

    #[test]
    fn remove_vertex_with_self_loop() {
        let mut g = IndexGraph::new_directed(GraphHints {
            allow_self_loops: true,
            allow_parallel_edges: true,
            ..GraphHints::default()
        });
        g.add_vertices(3);
        g.add_edge(2, 2).unwrap();
        g.add_edge(0, 2).unwrap();
        g.add_edge(2, 1).unwrap();
        g.remove_vertex(2).unwrap();
        assert_eq!(g.vertex_count(), 2);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn move_edge_keeps_index() {
        let mut g = IndexGraph::new_directed(GraphHints::default());
        g.add_vertices(3);
        let e = g.add_edge(0, 1).unwrap();
        g.move_edge(e, 1, 2).unwrap();
        assert_eq!(g.edge_endpoints(e), (1, 2));
        assert!(g.out_edges(0).is_empty());
        assert!(g.in_edges(2).contains(&e));
    }

    #[test]
    fn weight_columns_follow_swap_remove() {
        let mut g = IndexGraph::new_undirected(GraphHints::default());
        g.add_vertices(3);
        g.add_vertex_weights::<i64>("rank", 0).unwrap();
        {
            let w = g.vertex_weights_mut::<i64>("rank").unwrap();
            w.set(0, 10);
            w.set(1, 20);
            w.set(2, 30);
        }
        let v = g.add_vertex();
        assert_eq!(*g.vertex_weights::<i64>("rank").unwrap().get(v), 0);
        g.remove_vertex(1).unwrap();
        let w = g.vertex_weights::<i64>("rank").unwrap();
        assert_eq!(w.len(), 3);
        // vertex 3 slid into slot 1 carrying its weight
        assert_eq!(*w.get(1), 0);
        assert_eq!(*w.get(0), 10);
        assert_eq!(*w.get(2), 30);
    }

    #[test]
    fn duplicate_weight_key_is_rejected() {
        let mut g = IndexGraph::new_undirected(GraphHints::default());
        g.add_edge_weights::<f64>("w", 1.0).unwrap();
        assert!(matches!(
            g.add_edge_weights::<f64>("w", 2.0),
            Err(GraphError::DuplicateIdentifier(_))
        ));
    }

    #[test]
    fn clear_edges_keeps_vertices() {
        let mut g = IndexGraph::new_directed(GraphHints::default());
        g.add_vertices(3);
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 2).unwrap();
        g.clear_edges();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.edge_count(), 0);
        assert!(g.out_edges(0).is_empty());
    }
}
