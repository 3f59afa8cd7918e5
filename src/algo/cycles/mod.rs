//! Cycle algorithms: lazy elementary-cycle enumeration, minimum mean
//! cycles, and the Chinese postman tour.

pub mod johnson;
pub mod min_mean;
pub mod postman;
pub mod tarjan;

pub use johnson::{johnson_cycles, JohnsonCycles};
pub use min_mean::{minimum_mean_cycle_dasdan_gupta, minimum_mean_cycle_howard};
pub use postman::chinese_postman;
pub use tarjan::{tarjan_cycles, TarjanCycles};

use hashbrown::HashSet;

use crate::error::{GraphError, Result};
use crate::index_graph::IndexGraph;
use crate::mapping::Id;
use crate::path::{LabelledPath, Path};
use crate::LabelledGraph;

// enumeration requires a directed graph without parallel edges
pub(crate) fn check_enumerable(graph: &IndexGraph) -> Result<()> {
    if !graph.is_directed() {
        return Err(GraphError::UndirectedGraphRejected);
    }
    let mut seen = HashSet::with_capacity(graph.edge_count());
    for e in graph.edges() {
        let (u, v) = graph.edge_endpoints(e);
        if !seen.insert((u, v)) {
            return Err(GraphError::ParallelEdgesRejected { u, v });
        }
    }
    Ok(())
}

/// Which elementary-cycle enumerator a [`CycleEnumBuilder`] dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleEnumAlgo {
    #[default]
    Johnson,
    Tarjan,
}

/// Configurable entry point over the cycle enumerators.
#[derive(Debug, Clone, Default)]
pub struct CycleEnumBuilder {
    algo: CycleEnumAlgo,
}

impl CycleEnumBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn algorithm(mut self, algo: CycleEnumAlgo) -> Self {
        self.algo = algo;
        self
    }

    /// String-keyed configuration; unknown keys and values fail with
    /// [`GraphError::OptionUnknown`].
    pub fn set_option(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "impl" => {
                self.algo = match value {
                    "johnson" => CycleEnumAlgo::Johnson,
                    "tarjan" => CycleEnumAlgo::Tarjan,
                    other => return Err(GraphError::OptionUnknown(format!("impl={other}"))),
                };
                Ok(())
            }
            other => Err(GraphError::OptionUnknown(other.to_string())),
        }
    }

    /// A lazy iterator over the elementary cycles of `graph`.
    pub fn compute<'a>(&self, graph: &'a IndexGraph) -> Result<CyclesIter<'a>> {
        Ok(match self.algo {
            CycleEnumAlgo::Johnson => CyclesIter::Johnson(johnson_cycles(graph)?),
            CycleEnumAlgo::Tarjan => CyclesIter::Tarjan(tarjan_cycles(graph)?),
        })
    }

    /// Labelled façade: cycles come back with identifier-keyed vertex and
    /// edge lists.
    pub fn compute_labelled<'a, V: Id, E: Id>(
        &self,
        graph: &'a LabelledGraph<V, E>,
    ) -> Result<impl Iterator<Item = LabelledPath<V, E>> + 'a> {
        let iter = self.compute(graph.index_graph())?;
        Ok(iter.map(move |cycle| LabelledPath::from_index_path(graph, &cycle)))
    }
}

/// Either cycle enumerator behind one iterator type.
pub enum CyclesIter<'a> {
    Johnson(JohnsonCycles<'a>),
    Tarjan(TarjanCycles<'a>),
}

impl<'a> Iterator for CyclesIter<'a> {
    type Item = Path<'a>;

    fn next(&mut self) -> Option<Path<'a>> {
        match self {
            CyclesIter::Johnson(it) => it.next(),
            CyclesIter::Tarjan(it) => it.next(),
        }
    }
}
