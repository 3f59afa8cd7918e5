//! A graph keyed by caller-supplied identifiers, built by composition over
//! [`IndexGraph`].
//!
//! Every operation translates identifiers to dense indices, delegates to the
//! index graph, and translates results back. Nothing else happens here: the
//! index graph is the single source of truth, and algorithms run on it
//! directly through [`LabelledGraph::index_graph`].

use crate::error::{GraphError, Result};
use crate::index_graph::{GraphHints, IndexGraph};
use crate::mapping::{Id, IndexMapping};
use crate::weights::Weights;

/// A directed or undirected graph whose vertices and edges are identified by
/// arbitrary hashable values.
///
/// # Example
/// ```
/// use ixgraph::{GraphHints, LabelledGraph};
///
/// let mut g: LabelledGraph<&str, u32> = LabelledGraph::new_undirected(GraphHints::default());
/// g.add_vertex("amsterdam").unwrap();
/// g.add_vertex("berlin").unwrap();
/// g.add_edge(&"amsterdam", &"berlin", 7).unwrap();
/// assert!(g.contains_edge(&"berlin", &"amsterdam").unwrap());
/// assert_eq!(g.edge_source(&7).unwrap(), &"amsterdam");
/// ```
#[derive(Debug, Clone)]
pub struct LabelledGraph<V, E> {
    graph: IndexGraph,
    vertices: IndexMapping<V>,
    edges: IndexMapping<E>,
}

impl<V: Id, E: Id> LabelledGraph<V, E> {
    pub fn new_undirected(hints: GraphHints) -> Self {
        Self::wrap(IndexGraph::new_undirected(hints), hints)
    }

    pub fn new_directed(hints: GraphHints) -> Self {
        Self::wrap(IndexGraph::new_directed(hints), hints)
    }

    fn wrap(graph: IndexGraph, hints: GraphHints) -> Self {
        LabelledGraph {
            graph,
            vertices: IndexMapping::with_capacity(hints.expected_vertices),
            edges: IndexMapping::with_capacity(hints.expected_edges),
        }
    }

    /// The underlying index graph. Algorithms run on this and their results
    /// are translated back through [`LabelledGraph::vertex_id`] /
    /// [`LabelledGraph::edge_id`].
    pub fn index_graph(&self) -> &IndexGraph {
        &self.graph
    }

    pub fn is_directed(&self) -> bool {
        self.graph.is_directed()
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.vertex_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// The index currently backing the vertex `id`.
    pub fn vertex_index(&self, id: &V) -> Result<usize> {
        self.vertices
            .index_if_exists(id)
            .ok_or_else(|| GraphError::NoSuchVertex(format!("{id:?}")))
    }

    /// The index currently backing the edge `id`.
    pub fn edge_index(&self, id: &E) -> Result<usize> {
        self.edges
            .index_if_exists(id)
            .ok_or_else(|| GraphError::NoSuchEdge(format!("{id:?}")))
    }

    /// The identifier of the vertex at `index`.
    ///
    /// **Panics** if `index` is out of bounds.
    pub fn vertex_id(&self, index: usize) -> &V {
        self.vertices.id(index)
    }

    /// The identifier of the edge at `index`.
    ///
    /// **Panics** if `index` is out of bounds.
    pub fn edge_id(&self, index: usize) -> &E {
        self.edges.id(index)
    }

    pub fn contains_vertex(&self, id: &V) -> bool {
        self.vertices.contains(id)
    }

    /// Add a vertex under `id`.
    pub fn add_vertex(&mut self, id: V) -> Result<usize> {
        let index = self.vertices.insert(id)?;
        let graph_index = self.graph.add_vertex();
        debug_assert_eq!(index, graph_index);
        Ok(index)
    }

    /// Add every vertex of `ids`. If one of them is already present, the
    /// insertion fails with [`GraphError::DuplicateIdentifier`] and the
    /// vertices added so far are rolled back.
    pub fn add_vertices(&mut self, ids: impl IntoIterator<Item = V>) -> Result<()> {
        let first = self.vertex_count();
        for id in ids {
            if let Err(err) = self.add_vertex(id) {
                while self.vertex_count() > first {
                    let last = self.vertex_count() - 1;
                    self.graph
                        .remove_vertex(last)
                        .expect("rollback removes fresh vertices");
                    self.vertices.swap_remove(last);
                }
                return Err(err);
            }
        }
        Ok(())
    }

    /// Add an edge from `source` to `target` under `id`.
    pub fn add_edge(&mut self, source: &V, target: &V, id: E) -> Result<usize> {
        let s = self.vertex_index(source)?;
        let t = self.vertex_index(target)?;
        if self.edges.contains(&id) {
            return Err(GraphError::DuplicateIdentifier(format!("{id:?}")));
        }
        let index = self.graph.add_edge(s, t)?;
        let mapped = self.edges.insert(id)?;
        debug_assert_eq!(index, mapped);
        Ok(index)
    }

    /// Remove the vertex `id` and every edge incident to it.
    pub fn remove_vertex(&mut self, id: &V) -> Result<()> {
        let v = self.vertex_index(id)?;
        // drop incident edges through our own removal so the edge mapping
        // sees the same swap-remove sequence as the graph
        while let Some(&e) = self.graph.out_edges(v).last() {
            self.remove_edge_index(e);
        }
        if self.graph.is_directed() {
            while let Some(&e) = self.graph.in_edges(v).last() {
                self.remove_edge_index(e);
            }
        }
        self.graph.remove_vertex(v)?;
        self.vertices.swap_remove(v);
        Ok(())
    }

    /// Remove the edge `id`.
    pub fn remove_edge(&mut self, id: &E) -> Result<()> {
        let e = self.edge_index(id)?;
        self.remove_edge_index(e);
        Ok(())
    }

    fn remove_edge_index(&mut self, e: usize) {
        self.graph.remove_edge(e).expect("edge index is valid");
        self.edges.swap_remove(e);
    }

    /// Whether an edge `source -> target` exists (either orientation for
    /// undirected graphs).
    pub fn contains_edge(&self, source: &V, target: &V) -> Result<bool> {
        let s = self.vertex_index(source)?;
        let t = self.vertex_index(target)?;
        Ok(self.graph.contains_edge(s, t))
    }

    pub fn edge_source(&self, id: &E) -> Result<&V> {
        let e = self.edge_index(id)?;
        Ok(self.vertex_id(self.graph.edge_source(e)))
    }

    pub fn edge_target(&self, id: &E) -> Result<&V> {
        let e = self.edge_index(id)?;
        Ok(self.vertex_id(self.graph.edge_target(e)))
    }

    /// The endpoint of edge `id` other than `v`.
    pub fn edge_endpoint(&self, id: &E, v: &V) -> Result<&V> {
        let e = self.edge_index(id)?;
        let vi = self.vertex_index(v)?;
        Ok(self.vertex_id(self.graph.edge_endpoint(e, vi)?))
    }

    /// The identifiers of the edges leaving `v`. Live for the duration of
    /// the borrow; order matches the index graph's.
    pub fn out_edges<'a>(&'a self, v: &V) -> Result<impl Iterator<Item = &'a E> + 'a> {
        let vi = self.vertex_index(v)?;
        Ok(self.graph.out_edges(vi).iter().map(|&e| self.edge_id(e)))
    }

    /// The identifiers of the edges entering `v`.
    pub fn in_edges<'a>(&'a self, v: &V) -> Result<impl Iterator<Item = &'a E> + 'a> {
        let vi = self.vertex_index(v)?;
        Ok(self.graph.in_edges(vi).iter().map(|&e| self.edge_id(e)))
    }

    /// All vertex identifiers, in index order.
    pub fn vertices(&self) -> impl Iterator<Item = &V> {
        self.vertices.ids()
    }

    /// All edge identifiers, in index order.
    pub fn edges(&self) -> impl Iterator<Item = &E> {
        self.edges.ids()
    }

    pub fn clear(&mut self) {
        self.graph.clear();
        self.vertices.clear();
        self.edges.clear();
    }

    pub fn clear_edges(&mut self) {
        self.graph.clear_edges();
        self.edges.clear();
    }
}

/// Weight columns, identifier-keyed.
impl<V: Id, E: Id> LabelledGraph<V, E> {
    pub fn add_vertex_weights<T: Clone + 'static>(
        &mut self,
        key: impl Into<String>,
        default: T,
    ) -> Result<()> {
        self.graph.add_vertex_weights(key, default).map(|_| ())
    }

    pub fn add_edge_weights<T: Clone + 'static>(
        &mut self,
        key: impl Into<String>,
        default: T,
    ) -> Result<()> {
        self.graph.add_edge_weights(key, default).map(|_| ())
    }

    /// The index-keyed column registered under `key`; combine with
    /// [`LabelledGraph::vertex_index`] for identifier-keyed access.
    pub fn vertex_weights<T: 'static>(&self, key: &str) -> Option<&Weights<T>> {
        self.graph.vertex_weights(key)
    }

    pub fn edge_weights<T: 'static>(&self, key: &str) -> Option<&Weights<T>> {
        self.graph.edge_weights(key)
    }

    pub fn set_vertex_weight<T: Clone + 'static>(&mut self, key: &str, id: &V, value: T) -> Result<()> {
        let v = self.vertex_index(id)?;
        let column = self
            .graph
            .vertex_weights_mut::<T>(key)
            .ok_or_else(|| GraphError::NoSuchVertex(format!("weights {key:?}")))?;
        column.set(v, value);
        Ok(())
    }

    pub fn vertex_weight<T: Clone + 'static>(&self, key: &str, id: &V) -> Result<&T> {
        let v = self.vertex_index(id)?;
        let column = self
            .graph
            .vertex_weights::<T>(key)
            .ok_or_else(|| GraphError::NoSuchVertex(format!("weights {key:?}")))?;
        Ok(column.get(v))
    }

    pub fn set_edge_weight<T: Clone + 'static>(&mut self, key: &str, id: &E, value: T) -> Result<()> {
        let e = self.edge_index(id)?;
        let column = self
            .graph
            .edge_weights_mut::<T>(key)
            .ok_or_else(|| GraphError::NoSuchEdge(format!("weights {key:?}")))?;
        column.set(e, value);
        Ok(())
    }

    pub fn edge_weight<T: Clone + 'static>(&self, key: &str, id: &E) -> Result<&T> {
        let e = self.edge_index(id)?;
        let column = self
            .graph
            .edge_weights::<T>(key)
            .ok_or_else(|| GraphError::NoSuchEdge(format!("weights {key:?}")))?;
        Ok(column.get(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> LabelledGraph<char, &'static str> {
        let mut g = LabelledGraph::new_undirected(GraphHints::default());
        g.add_vertices(['a', 'b', 'c', 'd']).unwrap();
        g.add_edge(&'a', &'b', "ab").unwrap();
        g.add_edge(&'b', &'c', "bc").unwrap();
        g.add_edge(&'c', &'d', "cd").unwrap();
        g.add_edge(&'d', &'a', "da").unwrap();
        g
    }

    #[test]
    fn bijection_survives_removal() {
        let mut g = square();
        g.remove_vertex(&'b').unwrap();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.edge_count(), 2);
        for v in ['a', 'c', 'd'] {
            let i = g.vertex_index(&v).unwrap();
            assert_eq!(g.vertex_id(i), &v);
        }
        assert!(g.contains_edge(&'c', &'d').unwrap());
        assert!(g.contains_edge(&'d', &'a').unwrap());
        assert!(!g.contains_edge(&'a', &'c').unwrap());
        assert!(g.vertex_index(&'b').is_err());
        assert!(g.edge_index(&"ab").is_err());
    }

    #[test]
    fn duplicate_vertex_rolls_back_bulk_insert() {
        let mut g = square();
        let err = g.add_vertices(['x', 'y', 'a', 'z']).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateIdentifier(_)));
        assert_eq!(g.vertex_count(), 4);
        assert!(!g.contains_vertex(&'x'));
        assert!(!g.contains_vertex(&'y'));
    }

    #[test]
    fn adjacency_is_translated() {
        let g = square();
        let mut around_a: Vec<&str> = g.out_edges(&'a').unwrap().copied().collect();
        around_a.sort_unstable();
        assert_eq!(around_a, vec!["ab", "da"]);
    }

    #[test]
    fn identifier_keyed_weights() {
        let mut g = square();
        g.add_edge_weights::<f64>("len", 1.0).unwrap();
        g.set_edge_weight("len", &"bc", 2.5).unwrap();
        assert_eq!(*g.edge_weight::<f64>("len", &"bc").unwrap(), 2.5);
        assert_eq!(*g.edge_weight::<f64>("len", &"ab").unwrap(), 1.0);
    }

    #[test]
    fn duplicate_edge_identifier_leaves_graph_intact() {
        let mut g = square();
        let err = g.add_edge(&'a', &'c', "ab").unwrap_err();
        assert!(matches!(err, GraphError::DuplicateIdentifier(_)));
        assert_eq!(g.edge_count(), 4);
        assert!(!g.contains_edge(&'a', &'c').unwrap());
    }
}
