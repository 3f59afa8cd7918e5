//! Distance measures over an all-pairs shortest-path table: eccentricity,
//! radius, diameter, center and periphery.

use core::cell::OnceCell;

use crate::algo::shortest_paths::AllPairsDistances;
use crate::error::Result;
use crate::index_graph::IndexGraph;
use crate::mapping::Id;
use crate::LabelledGraph;

/// Lazily evaluated distance measures of a graph.
///
/// Built from a precomputed [`AllPairsDistances`] table; every measure is
/// computed on first access and cached. Unreachable pairs have infinite
/// distance, so the radius and diameter may be infinite; the center and
/// periphery are well defined regardless.
///
/// # Example
/// ```
/// use ixgraph::{GraphHints, IndexGraph};
/// use ixgraph::algo::distances::DistanceMeasures;
/// use ixgraph::algo::shortest_paths::all_pairs_distances;
///
/// // a path graph on five vertices
/// let mut g = IndexGraph::new_undirected(GraphHints::default());
/// g.add_vertices(5);
/// for v in 1..5 {
///     g.add_edge(v - 1, v).unwrap();
/// }
/// let table = all_pairs_distances(&g, |_| 1.0).unwrap();
/// let measures = DistanceMeasures::new(table);
/// assert_eq!(measures.radius(), 2.0);
/// assert_eq!(measures.diameter(), 4.0);
/// assert_eq!(measures.center(), &[2]);
/// assert_eq!(measures.periphery(), &[0, 4]);
/// ```
pub struct DistanceMeasures {
    table: AllPairsDistances,
    eccentricity: OnceCell<Vec<f64>>,
    radius: OnceCell<f64>,
    diameter: OnceCell<f64>,
    center: OnceCell<Vec<usize>>,
    periphery: OnceCell<Vec<usize>>,
}

impl DistanceMeasures {
    pub fn new(table: AllPairsDistances) -> Self {
        DistanceMeasures {
            table,
            eccentricity: OnceCell::new(),
            radius: OnceCell::new(),
            diameter: OnceCell::new(),
            center: OnceCell::new(),
            periphery: OnceCell::new(),
        }
    }

    /// Convenience constructor: compute the table with unit edge weights.
    pub fn by_cardinality(graph: &IndexGraph) -> Result<Self> {
        let table = crate::algo::shortest_paths::all_pairs_distances(graph, |_| 1.0)?;
        Ok(Self::new(table))
    }

    pub fn distance_table(&self) -> &AllPairsDistances {
        &self.table
    }

    fn eccentricities(&self) -> &[f64] {
        self.eccentricity.get_or_init(|| {
            let n = self.table.vertex_count();
            (0..n)
                .map(|v| {
                    self.table
                        .row(v)
                        .iter()
                        .copied()
                        .fold(f64::NEG_INFINITY, f64::max)
                })
                .collect()
        })
    }

    /// The maximum distance from `v` to any vertex.
    ///
    /// **Panics** if `v` is out of bounds.
    pub fn eccentricity(&self, v: usize) -> f64 {
        self.eccentricities()[v]
    }

    /// The minimum eccentricity over all vertices.
    pub fn radius(&self) -> f64 {
        *self.radius.get_or_init(|| {
            self.eccentricities()
                .iter()
                .copied()
                .fold(f64::INFINITY, f64::min)
        })
    }

    /// The maximum eccentricity over all vertices.
    pub fn diameter(&self) -> f64 {
        *self.diameter.get_or_init(|| {
            self.eccentricities()
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max)
        })
    }

    /// The vertices whose eccentricity attains the radius, up to a
    /// `1e-8 * radius` relative tolerance.
    pub fn center(&self) -> &[usize] {
        self.center.get_or_init(|| {
            let radius = self.radius();
            let eps = if radius.is_finite() { 1e-8 * radius } else { 0.0 };
            self.eccentricities()
                .iter()
                .enumerate()
                .filter(|&(_, &e)| e <= radius * (1.0 + eps))
                .map(|(v, _)| v)
                .collect()
        })
    }

    /// The vertices whose eccentricity attains the diameter, up to the
    /// same tolerance as [`DistanceMeasures::center`].
    pub fn periphery(&self) -> &[usize] {
        self.periphery.get_or_init(|| {
            let diameter = self.diameter();
            let eps = if diameter.is_finite() { 1e-8 * diameter } else { 0.0 };
            self.eccentricities()
                .iter()
                .enumerate()
                .filter(|&(_, &e)| e >= diameter / (1.0 + eps))
                .map(|(v, _)| v)
                .collect()
        })
    }
}

/// Labelled façade: center and periphery as identifier lists.
pub fn center_and_periphery_labelled<V: Id, E: Id>(
    graph: &LabelledGraph<V, E>,
    mut weight: impl FnMut(&E) -> f64,
) -> Result<(Vec<V>, Vec<V>)> {
    let table = crate::algo::shortest_paths::all_pairs_distances(graph.index_graph(), |e| {
        weight(graph.edge_id(e))
    })?;
    let measures = DistanceMeasures::new(table);
    let center = measures
        .center()
        .iter()
        .map(|&v| graph.vertex_id(v).clone())
        .collect();
    let periphery = measures
        .periphery()
        .iter()
        .map(|&v| graph.vertex_id(v).clone())
        .collect();
    Ok((center, periphery))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::shortest_paths::all_pairs_distances;
    use crate::index_graph::GraphHints;

    fn measures_of(g: &IndexGraph, w: &[f64]) -> DistanceMeasures {
        DistanceMeasures::new(all_pairs_distances(g, |e| w[e]).unwrap())
    }

    #[test]
    fn path_graph_measures() {
        let mut g = IndexGraph::new_undirected(GraphHints::default());
        g.add_vertices(5);
        for v in 1..5 {
            g.add_edge(v - 1, v).unwrap();
        }
        let m = DistanceMeasures::by_cardinality(&g).unwrap();
        assert_eq!(m.eccentricity(0), 4.0);
        assert_eq!(m.eccentricity(2), 2.0);
        assert_eq!(m.radius(), 2.0);
        assert_eq!(m.diameter(), 4.0);
        assert!(m.radius() <= m.diameter());
        assert_eq!(m.center(), &[2]);
        assert_eq!(m.periphery(), &[0, 4]);
    }

    #[test]
    fn weights_shift_the_center() {
        let mut g = IndexGraph::new_undirected(GraphHints::default());
        g.add_vertices(3);
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 2).unwrap();
        let m = measures_of(&g, &[10.0, 1.0]);
        // vertex 1 sees 10; vertex 2 sees 11; vertex 0 sees 11
        assert_eq!(m.radius(), 10.0);
        assert_eq!(m.diameter(), 11.0);
        assert_eq!(m.center(), &[1]);
        assert_eq!(m.periphery(), &[0, 2]);
    }

    #[test]
    fn disconnected_graph_is_infinite() {
        let mut g = IndexGraph::new_undirected(GraphHints::default());
        g.add_vertices(4);
        g.add_edge(0, 1).unwrap();
        g.add_edge(2, 3).unwrap();
        let m = DistanceMeasures::by_cardinality(&g).unwrap();
        assert!(m.radius().is_infinite());
        assert!(m.diameter().is_infinite());
        // every vertex is central and peripheral at infinity
        assert_eq!(m.center().len(), 4);
        assert_eq!(m.periphery().len(), 4);
    }

    #[test]
    fn directed_eccentricity_is_outbound() {
        let mut g = IndexGraph::new_directed(GraphHints::default());
        g.add_vertices(3);
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 2).unwrap();
        let m = DistanceMeasures::by_cardinality(&g).unwrap();
        assert_eq!(m.eccentricity(0), 2.0);
        assert!(m.eccentricity(2).is_infinite());
    }
}
