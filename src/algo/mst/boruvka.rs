//! Borůvka's minimum spanning forest, plus the contraction entry point the
//! randomized algorithm builds on.

use log::trace;

use super::{check_undirected, edge_less, MstResult};
use crate::error::Result;
use crate::index_graph::{GraphHints, IndexGraph};
use crate::unionfind::UnionFind;

/// Compute a minimum spanning forest with Borůvka's algorithm.
///
/// Rounds: each current tree selects its minimum-weight outgoing edge, all
/// selected edges are accepted at once (an edge selected from both sides is
/// taken only once), and the trees they connect are contracted. Ties are
/// broken by edge index, which makes the per-round edge set acyclic.
///
/// # Arguments
/// * `graph`: an undirected graph.
/// * `weight`: weight per edge index.
///
/// # Returns
/// * [`MstResult`]: the forest's edge set.
///
/// # Complexity
/// * Time complexity: **O(|E| log |V|)**.
/// * Auxiliary space: **O(|V| + |E|)**.
pub fn boruvka<W: Copy + PartialOrd>(
    graph: &IndexGraph,
    mut weight: impl FnMut(usize) -> W,
) -> Result<MstResult> {
    check_undirected(graph)?;
    let weights: Vec<W> = graph.edges().map(&mut weight).collect();
    let mut trees = UnionFind::new(graph.vertex_count());
    let mut forest = Vec::new();
    while round(graph, &weights, &mut trees, &mut forest) {}
    Ok(MstResult::new(forest))
}

// one Borůvka round; true iff any trees merged
fn round<W: Copy + PartialOrd>(
    graph: &IndexGraph,
    weights: &[W],
    trees: &mut UnionFind,
    forest: &mut Vec<usize>,
) -> bool {
    let n = graph.vertex_count();
    let mut cheapest = vec![usize::MAX; n];
    for e in graph.edges() {
        let (s, t) = graph.edge_endpoints(e);
        let (rs, rt) = (trees.find_mut(s), trees.find_mut(t));
        if rs == rt {
            continue;
        }
        for r in [rs, rt] {
            if cheapest[r] == usize::MAX || edge_less(weights, e, cheapest[r]) {
                cheapest[r] = e;
            }
        }
    }
    let mut merged = false;
    for r in 0..n {
        let e = cheapest[r];
        if e == usize::MAX {
            continue;
        }
        let (s, t) = graph.edge_endpoints(e);
        // both endpoints may have picked this edge; union dedups
        if trees.union(s, t) {
            forest.push(e);
            merged = true;
        }
    }
    trace!("boruvka round accepted {} edges so far", forest.len());
    merged
}

/// The outcome of a bounded number of Borůvka rounds: the partial forest
/// and the graph contracted along it.
#[derive(Debug)]
pub struct BoruvkaContraction {
    /// Forest edges accepted so far, in the input graph's edge space.
    pub forest: Vec<usize>,
    /// One vertex per tree; inter-tree edges only, parallel edges kept.
    pub contracted: IndexGraph,
    /// Input vertex index to contracted vertex index.
    pub vertex_map: Vec<usize>,
    /// Contracted edge index to input edge index.
    pub edge_origin: Vec<usize>,
}

/// Run at most `rounds` Borůvka rounds and contract the graph along the
/// accepted edges.
///
/// This is the secondary entry point the Karger-Klein-Tarjan algorithm
/// uses; `rounds == usize::MAX` behaves like [`boruvka`] followed by a
/// (then edgeless) contraction.
pub fn boruvka_rounds<W: Copy + PartialOrd>(
    graph: &IndexGraph,
    mut weight: impl FnMut(usize) -> W,
    rounds: usize,
) -> Result<BoruvkaContraction> {
    check_undirected(graph)?;
    let weights: Vec<W> = graph.edges().map(&mut weight).collect();
    let mut trees = UnionFind::new(graph.vertex_count());
    let mut forest = Vec::new();
    for _ in 0..rounds {
        if !round(graph, &weights, &mut trees, &mut forest) {
            break;
        }
    }
    let (vertex_map, tree_count) = trees.into_labeling();
    let mut contracted = IndexGraph::new_undirected(GraphHints {
        expected_vertices: tree_count,
        expected_edges: graph.edge_count(),
        allow_self_loops: false,
        allow_parallel_edges: true,
    });
    contracted.add_vertices(tree_count);
    let mut edge_origin = Vec::new();
    for e in graph.edges() {
        let (s, t) = graph.edge_endpoints(e);
        let (bs, bt) = (vertex_map[s], vertex_map[t]);
        if bs != bt {
            contracted.add_edge(bs, bt)?;
            edge_origin.push(e);
        }
    }
    Ok(BoruvkaContraction {
        forest,
        contracted,
        vertex_map,
        edge_origin,
    })
}
