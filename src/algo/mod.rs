/*!
The algorithm catalog.

Every algorithm takes an [`IndexGraph`](crate::IndexGraph) by shared
reference together with any weights it needs as a per-edge-index closure,
and returns a freshly allocated result in index space. Families with a
labelled counterpart expose it next to the index entry point (or through
the family's builder), translating identifiers on the way in and results
on the way out.

Families with several interchangeable implementations are selected through
a builder with an enumerated selector (for example
[`mst::MstBuilder`]); unknown string options fail with
[`OptionUnknown`](crate::GraphError::OptionUnknown).
*/

pub mod cliques;
pub mod connectivity;
pub mod cycles;
pub mod distances;
pub mod hamiltonian;
pub mod mdst;
pub mod mst;
pub mod shortest_paths;

pub use cliques::{maximal_cliques, maximal_independent_sets, CliqueAlgo};
pub use connectivity::{connected_components, strongly_connected_components};
pub use cycles::{
    chinese_postman, johnson_cycles, minimum_mean_cycle_dasdan_gupta, minimum_mean_cycle_howard,
    tarjan_cycles, CycleEnumAlgo, CycleEnumBuilder,
};
pub use distances::DistanceMeasures;
pub use hamiltonian::{hamiltonian_cycles, hamiltonian_paths};
pub use mdst::{minimum_directed_spanning_tree, MdstResult};
pub use mst::{MstAlgo, MstBuilder, MstResult};
pub use shortest_paths::{all_pairs_distances, dijkstra, AllPairsDistances, ShortestPathTree};
