//! Minimum spanning tree and forest algorithms for undirected graphs.
//!
//! Every entry point takes a graph and an edge weight function and returns
//! the edge set of a minimum spanning forest (a tree per connected
//! component). All of them refuse directed graphs with
//! [`GraphError::DirectedGraphRejected`].
//!
//! For the directed counterpart (minimum arborescence) see
//! [`crate::algo::mdst`].

pub mod boruvka;
pub mod fredman_tarjan;
pub mod kkt;
pub mod kruskal;
pub mod prim;
pub mod yao;

pub use boruvka::{boruvka, boruvka_rounds, BoruvkaContraction};
pub use fredman_tarjan::fredman_tarjan;
pub use kkt::karger_klein_tarjan;
pub use kruskal::kruskal;
pub use prim::prim;
pub use yao::yao;

use crate::error::{GraphError, Result};
use crate::index_graph::IndexGraph;
use crate::mapping::Id;
use crate::LabelledGraph;

/// The edge set of a computed minimum spanning forest.
///
/// Edges are reported in ascending index order regardless of the algorithm
/// that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MstResult {
    edges: Vec<usize>,
}

impl MstResult {
    pub(crate) fn new(mut edges: Vec<usize>) -> Self {
        edges.sort_unstable();
        MstResult { edges }
    }

    /// The forest's edges, ascending.
    pub fn edges(&self) -> &[usize] {
        &self.edges
    }

    pub fn into_edges(self) -> Vec<usize> {
        self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Total forest weight under `weight`.
    pub fn total_weight(&self, weight: impl Fn(usize) -> f64) -> f64 {
        self.edges.iter().map(|&e| weight(e)).sum()
    }
}

pub(crate) fn check_undirected(graph: &IndexGraph) -> Result<()> {
    if graph.is_directed() {
        Err(GraphError::DirectedGraphRejected)
    } else {
        Ok(())
    }
}

// (weight, edge index) gives the strict total order the forest algorithms
// tie-break with
pub(crate) fn edge_less<W: Copy + PartialOrd>(weights: &[W], a: usize, b: usize) -> bool {
    match weights[a].partial_cmp(&weights[b]) {
        Some(core::cmp::Ordering::Less) => true,
        Some(core::cmp::Ordering::Greater) => false,
        _ => a < b,
    }
}

/// Which implementation a [`MstBuilder`] dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MstAlgo {
    #[default]
    Kruskal,
    Prim,
    Boruvka,
    Yao,
    FredmanTarjan,
    KargerKleinTarjan,
}

/// Configurable entry point over the whole MST family.
///
/// # Example
/// ```
/// use ixgraph::{GraphHints, IndexGraph};
/// use ixgraph::algo::mst::{MstAlgo, MstBuilder};
///
/// let mut g = IndexGraph::new_undirected(GraphHints::default());
/// g.add_vertices(4);
/// let weights = [1.0, 2.0, 3.0, 4.0];
/// for (u, v) in [(0, 1), (1, 2), (2, 3), (3, 0)] {
///     g.add_edge(u, v).unwrap();
/// }
/// let mst = MstBuilder::new()
///     .algorithm(MstAlgo::Boruvka)
///     .compute(&g, |e| weights[e])
///     .unwrap();
/// assert_eq!(mst.edges(), &[0, 1, 2]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MstBuilder {
    algo: MstAlgo,
    seed: Option<u64>,
    parallel_sort: bool,
}

impl MstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn algorithm(mut self, algo: MstAlgo) -> Self {
        self.algo = algo;
        self
    }

    /// Seed for the randomized Karger-Klein-Tarjan implementation; ignored
    /// by the deterministic ones.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sort Kruskal's edge array on two worker threads. Never changes the
    /// result.
    pub fn parallel_sort(mut self, enabled: bool) -> Self {
        self.parallel_sort = enabled;
        self
    }

    /// String-keyed configuration, for callers driving the builder from
    /// external settings. Unknown keys and unparsable values fail with
    /// [`GraphError::OptionUnknown`].
    pub fn set_option(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "impl" => {
                self.algo = match value {
                    "kruskal" => MstAlgo::Kruskal,
                    "prim" => MstAlgo::Prim,
                    "boruvka" => MstAlgo::Boruvka,
                    "yao" => MstAlgo::Yao,
                    "fredman-tarjan" => MstAlgo::FredmanTarjan,
                    "karger-klein-tarjan" => MstAlgo::KargerKleinTarjan,
                    other => return Err(GraphError::OptionUnknown(format!("impl={other}"))),
                };
            }
            "seed" => {
                self.seed = Some(
                    value
                        .parse()
                        .map_err(|_| GraphError::OptionUnknown(format!("seed={value}")))?,
                );
            }
            "parallel-sort" => {
                self.parallel_sort = value
                    .parse()
                    .map_err(|_| GraphError::OptionUnknown(format!("parallel-sort={value}")))?;
            }
            other => return Err(GraphError::OptionUnknown(other.to_string())),
        }
        Ok(())
    }

    /// Run the selected implementation.
    pub fn compute(
        &self,
        graph: &IndexGraph,
        mut weight: impl FnMut(usize) -> f64,
    ) -> Result<MstResult> {
        match self.algo {
            MstAlgo::Kruskal if self.parallel_sort => kruskal::kruskal_parallel_sort(graph, weight),
            MstAlgo::Kruskal => kruskal(graph, weight),
            MstAlgo::Prim => prim(graph, weight),
            MstAlgo::Boruvka => boruvka(graph, weight),
            MstAlgo::Yao => yao(graph, weight),
            MstAlgo::FredmanTarjan => fredman_tarjan(graph, weight),
            MstAlgo::KargerKleinTarjan => karger_klein_tarjan(graph, &mut weight, self.seed),
        }
    }

    /// Labelled façade: weights come keyed by edge identifier and the
    /// resulting forest is translated back to identifiers.
    pub fn compute_labelled<V: Id, E: Id>(
        &self,
        graph: &LabelledGraph<V, E>,
        mut weight: impl FnMut(&E) -> f64,
    ) -> Result<Vec<E>> {
        let result = self.compute(graph.index_graph(), |e| weight(graph.edge_id(e)))?;
        Ok(result
            .edges()
            .iter()
            .map(|&e| graph.edge_id(e).clone())
            .collect())
    }
}
