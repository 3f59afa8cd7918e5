//! Tarjan's minimum directed spanning tree (minimum arborescence).

use fixedbitset::FixedBitSet;
use log::trace;

use crate::algo::connectivity::tarjan_scc;
use crate::error::{GraphError, Result};
use crate::heap::PairingHeaps;
use crate::index_graph::{GraphHints, IndexGraph};
use crate::mapping::Id;
use crate::path::reachable_vertices;
use crate::unionfind::UnionFind;
use crate::LabelledGraph;

const NONE: usize = usize::MAX;

/// The edge set of a computed minimum arborescence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MdstResult {
    edges: Vec<usize>,
}

impl MdstResult {
    fn new(mut edges: Vec<usize>) -> Self {
        edges.sort_unstable();
        MdstResult { edges }
    }

    /// The arborescence's edges, ascending.
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

    pub fn total_weight(&self, weight: impl Fn(usize) -> f64) -> f64 {
        self.edges.iter().map(|&e| weight(e)).sum()
    }
}

/// Compute a minimum-weight arborescence rooted at `root` with Tarjan's
/// algorithm, spanning exactly the vertices reachable from `root`.
///
/// The input is never mutated: the algorithm restricts a private copy to
/// the reachable subgraph, makes it strongly connected with high-weight
/// artificial edges into the root, then runs the contraction loop — pop the
/// cheapest incoming edge of the current vertex, subtract its weight from
/// the rest of the heap, follow the edge's source, and contract whenever the
/// walk closes a cycle, melding the members' heaps into the new
/// super-vertex. A final expansion from the root unrolls the contraction
/// forest and drops the artificial edges.
///
/// Heap order is strict on (adjusted weight, edge index).
///
/// # Arguments
/// * `graph`: a directed graph.
/// * `root`: the arborescence root.
/// * `weight`: weight per edge index.
///
/// # Returns
/// * [`MdstResult`]: one incoming edge per reachable non-root vertex.
///
/// # Complexity
/// * Time complexity: **O(|E| log |V|)**.
/// * Auxiliary space: **O(|V| + |E|)**.
///
/// # Example
/// ```
/// use ixgraph::{GraphHints, IndexGraph};
/// use ixgraph::algo::mdst::minimum_directed_spanning_tree;
///
/// let mut g = IndexGraph::new_directed(GraphHints::default());
/// g.add_vertices(3);
/// let weights = [1.0, 1.0, 5.0, 5.0];
/// for (u, v) in [(0, 1), (0, 2), (1, 2), (2, 1)] {
///     g.add_edge(u, v).unwrap();
/// }
/// let tree = minimum_directed_spanning_tree(&g, 0, |e| weights[e]).unwrap();
/// assert_eq!(tree.edges(), &[0, 1]);
/// assert_eq!(tree.total_weight(|e| weights[e]), 2.0);
/// ```
pub fn minimum_directed_spanning_tree(
    graph: &IndexGraph,
    root: usize,
    mut weight: impl FnMut(usize) -> f64,
) -> Result<MdstResult> {
    if !graph.is_directed() {
        return Err(GraphError::UndirectedGraphRejected);
    }
    if root >= graph.vertex_count() {
        return Err(GraphError::NoSuchVertex(root.to_string()));
    }

    // restrict to the subgraph reachable from the root
    let reach = reachable_vertices(graph, [root])?;
    let mut work_of = vec![NONE; graph.vertex_count()];
    let mut orig_of = Vec::new();
    for v in reach.ones() {
        work_of[v] = orig_of.len();
        orig_of.push(v);
    }
    let n = orig_of.len();
    if n <= 1 {
        return Ok(MdstResult::new(Vec::new()));
    }
    let mut work = IndexGraph::new_directed(GraphHints {
        expected_vertices: n,
        expected_edges: graph.edge_count() + n,
        allow_self_loops: false,
        allow_parallel_edges: true,
    });
    work.add_vertices(n);
    let mut orig_edge = Vec::new();
    let mut ew = Vec::new();
    let mut weight_span = 0.0;
    for e in graph.edges() {
        let (s, t) = graph.edge_endpoints(e);
        if s == t || !reach.contains(s) || !reach.contains(t) {
            continue;
        }
        work.add_edge(work_of[s], work_of[t])?;
        let w = weight(e);
        weight_span += w.abs();
        orig_edge.push(Some(e));
        ew.push(w);
    }
    let wroot = work_of[root];

    // make it strongly connected: one artificial high-weight edge from each
    // non-root component into the root
    let (comp, comp_count) = tarjan_scc(&work, None);
    let high = weight_span + 1.0;
    let mut comp_done = vec![false; comp_count];
    comp_done[comp[wroot]] = true;
    for v in 0..n {
        if !comp_done[comp[v]] {
            comp_done[comp[v]] = true;
            work.add_edge(v, wroot)?;
            orig_edge.push(None);
            ew.push(high);
        }
    }

    let chosen = contract(&work, &ew, wroot);
    let mut edges = Vec::with_capacity(n - 1);
    for e in chosen {
        match orig_edge[e] {
            Some(orig) => edges.push(orig),
            None => debug_assert!(false, "artificial edge survived expansion"),
        }
    }
    debug_assert_eq!(edges.len(), n - 1);
    Ok(MdstResult::new(edges))
}

// the contraction loop and the expansion, on the strongly connected working
// graph; returns the chosen working-edge set
fn contract(work: &IndexGraph, ew: &[f64], wroot: usize) -> Vec<usize> {
    let n = work.vertex_count();
    let cap = 2 * n;
    let mut parent = vec![NONE; cap];
    let mut child = vec![NONE; cap];
    let mut brother = vec![NONE; cap];
    let mut in_edge = vec![NONE; cap];
    // some working vertex inside each super-vertex, for union-find access
    let mut inner_vertex: Vec<usize> = (0..cap).map(|s| if s < n { s } else { NONE }).collect();
    // union-find root -> live super-vertex id
    let mut label: Vec<usize> = (0..n).collect();
    let mut classes = UnionFind::new(n);

    let mut heaps = PairingHeaps::with_capacity(work.edge_count());
    let mut heap = vec![None; cap];
    for v in 0..n {
        for &e in work.in_edges(v) {
            heap[v] = heaps.push(heap[v], ew[e], e);
        }
    }

    let mut next_super = n;
    let mut on_path = FixedBitSet::with_capacity(cap);
    let mut path = vec![0usize];
    on_path.insert(0);
    let mut current = 0usize;

    'grow: loop {
        // cheapest incoming edge from outside the current super-vertex
        let source_super = loop {
            let Some((rest, (key, e))) = heaps.pop(heap[current]) else {
                break 'grow;
            };
            heap[current] = rest;
            let src = label[classes.find_mut(work.edge_source(e))];
            if src == current {
                continue;
            }
            heaps.add_offset(heap[current], -key);
            in_edge[current] = e;
            break src;
        };
        if !on_path.put(source_super) {
            path.push(source_super);
            current = source_super;
            continue;
        }
        // the walk closed a cycle: contract everything on the path back to
        // the source into a fresh super-vertex
        let s = next_super;
        next_super += 1;
        let mut merged = None;
        loop {
            let member = path.pop().expect("cycle member on path");
            on_path.set(member, false);
            parent[member] = s;
            brother[member] = child[s];
            child[s] = member;
            merged = heaps.meld(merged, heap[member]);
            heap[member] = None;
            let mv = inner_vertex[member];
            if inner_vertex[s] == NONE {
                inner_vertex[s] = mv;
            } else {
                classes.union(inner_vertex[s], mv);
            }
            if member == source_super {
                break;
            }
        }
        label[classes.find_mut(inner_vertex[s])] = s;
        heap[s] = merged;
        on_path.insert(s);
        path.push(s);
        current = s;
        trace!("mdst contracted super-vertex {s}");
    }

    // expansion: break open every super-vertex not containing the root's
    // tree, keeping the chosen incoming edge of everything else
    let mut queue = Vec::new();
    let mut dismantle = |u: usize, parent: &mut Vec<usize>, child: &mut [usize], queue: &mut Vec<usize>| {
        let mut u = u;
        while parent[u] != NONE {
            let p = parent[u];
            let mut c = child[p];
            while c != NONE {
                if c != u {
                    parent[c] = NONE;
                    queue.push(c);
                }
                c = brother[c];
            }
            child[p] = NONE;
            parent[u] = NONE;
            u = p;
        }
    };
    let mut chosen = Vec::new();
    dismantle(wroot, &mut parent, &mut child, &mut queue);
    while let Some(c) = queue.pop() {
        let e = in_edge[c];
        debug_assert_ne!(e, NONE, "expanded super-vertex has a chosen in-edge");
        chosen.push(e);
        dismantle(work.edge_target(e), &mut parent, &mut child, &mut queue);
    }
    chosen
}

/// Labelled façade over [`minimum_directed_spanning_tree`].
pub fn minimum_directed_spanning_tree_labelled<V: Id, E: Id>(
    graph: &LabelledGraph<V, E>,
    root: &V,
    mut weight: impl FnMut(&E) -> f64,
) -> Result<Vec<E>> {
    let r = graph.vertex_index(root)?;
    let result =
        minimum_directed_spanning_tree(graph.index_graph(), r, |e| weight(graph.edge_id(e)))?;
    Ok(result
        .edges()
        .iter()
        .map(|&e| graph.edge_id(e).clone())
        .collect())
}
