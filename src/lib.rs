//! **ixgraph** is a graph data structure and algorithms library.
//!
//! The central type is [`IndexGraph`]: a directed or undirected graph
//! whose vertices and edges occupy the dense index ranges `0..n` and
//! `0..m`, the representation every algorithm in [`algo`] runs on.
//! [`LabelledGraph`] layers caller-supplied vertex and edge identifiers
//! of any hashable type on top of an index graph by composition, and the
//! labelled algorithm façades translate inputs and results through its
//! [`mapping`].
//!
//! Removal keeps the index ranges compact by swapping the removed index
//! with the last one; per-index [`Weights`] columns registered on a graph
//! are renumbered in lockstep.
//!
//! ```
//! use ixgraph::{GraphHints, IndexGraph};
//! use ixgraph::algo::mst::kruskal;
//!
//! let mut g = IndexGraph::new_undirected(GraphHints::default());
//! g.add_vertices(4);
//! let weights = [1.0, 2.0, 3.0, 4.0];
//! for (u, v) in [(0, 1), (1, 2), (2, 3), (3, 0)] {
//!     g.add_edge(u, v).unwrap();
//! }
//! let mst = kruskal(&g, |e| weights[e]).unwrap();
//! assert_eq!(mst.edges(), &[0, 1, 2]);
//! ```

pub mod algo;
pub mod error;
pub mod heap;
pub mod index_graph;
pub mod labelled;
pub mod mapping;
pub mod path;
pub mod partition;
pub mod unionfind;
pub mod weights;

pub use error::{GraphError, Result};
pub use index_graph::{GraphHints, IndexGraph};
pub use labelled::LabelledGraph;
pub use mapping::{Id, IndexMapping};
pub use path::{find_path, find_path_labelled, reachable_vertices, LabelledPath, Path};
pub use partition::{LabelledPartition, VertexPartition};
pub use weights::Weights;
