//! Partitions of the vertex set, the output shape of the connectivity
//! algorithms.

use core::cell::OnceCell;

use fxhash::FxHashMap;
use hashbrown::HashSet;

use crate::error::{GraphError, Result};
use crate::index_graph::{GraphHints, IndexGraph};
use crate::mapping::Id;
use crate::LabelledGraph;

const NO_EDGES: &[usize] = &[];

/// A partition of a graph's vertices into blocks `0..number_of_blocks()`.
///
/// The per-block vertex sets, in-block edge sets and cross-block edge sets
/// are materialized lazily on first access and cached. Cross-block edges are
/// stored either in a dense `k x k` table or in a map keyed by the packed
/// block pair, whichever is smaller for the graph at hand.
pub struct VertexPartition<'a> {
    graph: &'a IndexGraph,
    block: Vec<usize>,
    num_blocks: usize,
    // vertices sorted by block + per-block offsets (k + 1 entries)
    by_block: OnceCell<(Vec<usize>, Vec<usize>)>,
    cross: OnceCell<CrossEdges>,
}

enum CrossEdges {
    Dense(Vec<Vec<usize>>),
    Hashed(FxHashMap<u64, Vec<usize>>),
}

impl<'a> VertexPartition<'a> {
    /// Wrap a per-vertex block assignment. `block` must hold one entry per
    /// vertex; the block count is one past the largest assigned block.
    pub fn new(graph: &'a IndexGraph, block: Vec<usize>) -> Result<Self> {
        if block.len() != graph.vertex_count() {
            return Err(GraphError::InvariantViolated(
                "partition must assign a block to every vertex",
            ));
        }
        let num_blocks = block.iter().max().map_or(0, |&b| b + 1);
        Ok(VertexPartition {
            graph,
            block,
            num_blocks,
            by_block: OnceCell::new(),
            cross: OnceCell::new(),
        })
    }

    pub fn graph(&self) -> &'a IndexGraph {
        self.graph
    }

    pub fn number_of_blocks(&self) -> usize {
        self.num_blocks
    }

    /// The block vertex `v` belongs to.
    ///
    /// **Panics** if `v` is out of bounds.
    pub fn vertex_block(&self, v: usize) -> usize {
        self.block[v]
    }

    /// The vertices of block `b`, ascending.
    ///
    /// **Panics** if `b` is not a block.
    pub fn block_vertices(&self, b: usize) -> &[usize] {
        let (order, offsets) = self.by_block.get_or_init(|| {
            let mut order: Vec<usize> = self.graph.vertices().collect();
            order.sort_unstable_by_key(|&v| self.block[v]);
            let mut offsets = vec![0; self.num_blocks + 1];
            for &v in &order {
                offsets[self.block[v] + 1] += 1;
            }
            for i in 1..offsets.len() {
                offsets[i] += offsets[i - 1];
            }
            (order, offsets)
        });
        assert!(b < self.num_blocks, "no such block");
        &order[offsets[b]..offsets[b + 1]]
    }

    /// The edges with both endpoints in block `b`.
    pub fn block_edges(&self, b: usize) -> &[usize] {
        assert!(b < self.num_blocks, "no such block");
        self.lookup(b, b)
    }

    /// The edges between blocks `b1` and `b2`. For undirected graphs the
    /// pair is unordered; for directed graphs only `b1 -> b2` edges count.
    pub fn cross_edges(&self, b1: usize, b2: usize) -> &[usize] {
        assert!(b1 < self.num_blocks && b2 < self.num_blocks, "no such block");
        self.lookup(b1, b2)
    }

    fn pair(&self, b1: usize, b2: usize) -> (usize, usize) {
        if self.graph.is_directed() || b1 <= b2 {
            (b1, b2)
        } else {
            (b2, b1)
        }
    }

    fn lookup(&self, b1: usize, b2: usize) -> &[usize] {
        let cross = self.cross.get_or_init(|| self.materialize_cross());
        let (b1, b2) = self.pair(b1, b2);
        match cross {
            CrossEdges::Dense(table) => &table[b1 * self.num_blocks + b2],
            CrossEdges::Hashed(map) => map
                .get(&Self::packed(b1, b2))
                .map_or(NO_EDGES, Vec::as_slice),
        }
    }

    fn packed(b1: usize, b2: usize) -> u64 {
        ((b1 as u64) << 32) | b2 as u64
    }

    fn materialize_cross(&self) -> CrossEdges {
        let k = self.num_blocks;
        let m = self.graph.edge_count();
        if k.saturating_mul(k) < 4 * m {
            let mut table = vec![Vec::new(); k * k];
            for e in self.graph.edges() {
                let (s, t) = self.graph.edge_endpoints(e);
                let (b1, b2) = self.pair(self.block[s], self.block[t]);
                table[b1 * k + b2].push(e);
            }
            CrossEdges::Dense(table)
        } else {
            let mut map: FxHashMap<u64, Vec<usize>> = FxHashMap::default();
            for e in self.graph.edges() {
                let (s, t) = self.graph.edge_endpoints(e);
                let (b1, b2) = self.pair(self.block[s], self.block[t]);
                map.entry(Self::packed(b1, b2)).or_default().push(e);
            }
            CrossEdges::Hashed(map)
        }
    }

    /// The quotient graph: one vertex per block. With `parallel_edges` every
    /// inter-block edge contributes one quotient edge; without, connected
    /// block pairs contribute exactly one. In-block edges appear as
    /// self-loops iff `self_loops` is set.
    pub fn blocks_graph(&self, parallel_edges: bool, self_loops: bool) -> IndexGraph {
        let hints = GraphHints {
            expected_vertices: self.num_blocks,
            expected_edges: self.graph.edge_count(),
            allow_self_loops: self_loops,
            allow_parallel_edges: parallel_edges,
        };
        let mut quotient = if self.graph.is_directed() {
            IndexGraph::new_directed(hints)
        } else {
            IndexGraph::new_undirected(hints)
        };
        quotient.add_vertices(self.num_blocks);
        let mut seen: HashSet<(usize, usize)> = HashSet::new();
        for e in self.graph.edges() {
            let (s, t) = self.graph.edge_endpoints(e);
            let (b1, b2) = self.pair(self.block[s], self.block[t]);
            if b1 == b2 && !self_loops {
                continue;
            }
            if !parallel_edges && !seen.insert((b1, b2)) {
                continue;
            }
            quotient
                .add_edge(b1, b2)
                .expect("quotient policies admit this edge");
        }
        quotient
    }
}

impl core::fmt::Debug for VertexPartition<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VertexPartition")
            .field("blocks", &self.num_blocks)
            .field("assignment", &self.block)
            .finish()
    }
}

/// A partition translated to identifier space.
pub struct LabelledPartition<'a, V, E> {
    graph: &'a LabelledGraph<V, E>,
    partition: VertexPartition<'a>,
}

impl<'a, V: Id, E: Id> LabelledPartition<'a, V, E> {
    pub fn new(graph: &'a LabelledGraph<V, E>, partition: VertexPartition<'a>) -> Self {
        LabelledPartition { graph, partition }
    }

    pub fn number_of_blocks(&self) -> usize {
        self.partition.number_of_blocks()
    }

    pub fn vertex_block(&self, id: &V) -> Result<usize> {
        Ok(self.partition.vertex_block(self.graph.vertex_index(id)?))
    }

    pub fn block_vertices(&self, b: usize) -> Vec<&V> {
        self.partition
            .block_vertices(b)
            .iter()
            .map(|&v| self.graph.vertex_id(v))
            .collect()
    }

    pub fn block_edges(&self, b: usize) -> Vec<&E> {
        self.partition
            .block_edges(b)
            .iter()
            .map(|&e| self.graph.edge_id(e))
            .collect()
    }

    pub fn cross_edges(&self, b1: usize, b2: usize) -> Vec<&E> {
        self.partition
            .cross_edges(b1, b2)
            .iter()
            .map(|&e| self.graph.edge_id(e))
            .collect()
    }
}
