//! The randomized Karger-Klein-Tarjan minimum spanning forest, expected
//! linear time.

use fixedbitset::FixedBitSet;
use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::boruvka::boruvka_rounds;
use super::{check_undirected, kruskal, MstResult};
use crate::error::Result;
use crate::index_graph::{GraphHints, IndexGraph};

// below this size the recursion hands over to Kruskal
const BASE_CASE_EDGES: usize = 16;

/// Compute a minimum spanning forest with the Karger-Klein-Tarjan
/// randomized algorithm.
///
/// Two Borůvka rounds produce a partial forest and a contracted graph `G0`.
/// A random half `G1` of `G0`'s edges is solved recursively into a forest
/// `F1`; every `G0` edge heavier than the heaviest `F1` edge on the tree
/// path between its endpoints cannot be in any minimum spanning forest and
/// is dropped, and the surviving light edges are solved recursively.
///
/// The random sampling never affects which forest is returned, only how
/// much work is spent finding it; with a fixed `seed` the run is fully
/// deterministic.
///
/// # Arguments
/// * `graph`: an undirected graph.
/// * `weight`: weight per edge index.
/// * `seed`: RNG seed; entropy-seeded when `None`.
///
/// # Returns
/// * [`MstResult`]: the forest's edge set.
///
/// # Complexity
/// * Time complexity: expected **O(|V| + |E|)**.
/// * Auxiliary space: **O(|V| + |E|)**.
pub fn karger_klein_tarjan<W: Copy + PartialOrd>(
    graph: &IndexGraph,
    mut weight: impl FnMut(usize) -> W,
    seed: Option<u64>,
) -> Result<MstResult> {
    check_undirected(graph)?;
    let weights: Vec<W> = graph.edges().map(&mut weight).collect();
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let forest = solve(graph, &weights, &mut rng)?;
    Ok(MstResult::new(forest))
}

fn solve<W: Copy + PartialOrd>(
    graph: &IndexGraph,
    weights: &[W],
    rng: &mut StdRng,
) -> Result<Vec<usize>> {
    let m = graph.edge_count();
    if m == 0 {
        return Ok(Vec::new());
    }
    if m <= BASE_CASE_EDGES || graph.vertex_count() <= 2 {
        return Ok(kruskal(graph, |e| weights[e])?.into_edges());
    }

    let contraction = boruvka_rounds(graph, |e| weights[e], 2)?;
    let mut forest = contraction.forest;
    let g0 = contraction.contracted;
    let origin0 = contraction.edge_origin;
    if g0.edge_count() == 0 {
        return Ok(forest);
    }
    let w0: Vec<W> = origin0.iter().map(|&e| weights[e]).collect();
    trace!(
        "kkt: contracted to {} vertices / {} edges",
        g0.vertex_count(),
        g0.edge_count()
    );

    // random-0.5 subgraph of g0
    let (g1, origin1, w1) = subgraph(&g0, &w0, |e| rng.gen_bool(0.5).then_some(e));
    let f1: Vec<usize> = solve(&g1, &w1, rng)?
        .into_iter()
        .map(|e| origin1[e])
        .collect();

    // edges of g0 that survive the cycle-property filter against f1
    let light = light_edges(&g0, &w0, &f1);
    let (g2, origin2, w2) = subgraph(&g0, &w0, |e| light.contains(e).then_some(e));
    let f2 = solve(&g2, &w2, rng)?;
    forest.extend(f2.into_iter().map(|e| origin0[origin2[e]]));
    Ok(forest)
}

fn subgraph<W: Copy + PartialOrd>(
    graph: &IndexGraph,
    weights: &[W],
    mut keep: impl FnMut(usize) -> Option<usize>,
) -> (IndexGraph, Vec<usize>, Vec<W>) {
    let mut sub = IndexGraph::new_undirected(GraphHints {
        expected_vertices: graph.vertex_count(),
        expected_edges: graph.edge_count(),
        allow_self_loops: false,
        allow_parallel_edges: true,
    });
    sub.add_vertices(graph.vertex_count());
    let mut origin = Vec::new();
    let mut w = Vec::new();
    for e in graph.edges() {
        if keep(e).is_none() {
            continue;
        }
        let (s, t) = graph.edge_endpoints(e);
        sub.add_edge(s, t).expect("subgraph policies admit this edge");
        origin.push(e);
        w.push(weights[e]);
    }
    (sub, origin, w)
}

fn greater<W: Copy + PartialOrd>(a: W, b: W) -> bool {
    matches!(a.partial_cmp(&b), Some(core::cmp::Ordering::Greater))
}

/// The edges of `graph` that are *light* with respect to the forest `f1`:
/// edges whose endpoints lie in different `f1` trees, plus edges no heavier
/// than the maximum-weight `f1` edge on the tree path between their
/// endpoints. Uses a binary-lifting path-maxima oracle.
fn light_edges<W: Copy + PartialOrd>(
    graph: &IndexGraph,
    weights: &[W],
    f1: &[usize],
) -> FixedBitSet {
    let n = graph.vertex_count();
    let m = graph.edge_count();
    let mut in_f1 = FixedBitSet::with_capacity(m);
    let mut adj: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
    for &e in f1 {
        in_f1.insert(e);
        let (s, t) = graph.edge_endpoints(e);
        adj[s].push((t, e));
        adj[t].push((s, e));
    }

    // root every f1 tree, recording depth and parent edge
    const NONE: usize = usize::MAX;
    let mut comp = vec![NONE; n];
    let mut depth = vec![0usize; n];
    let mut parent = vec![NONE; n];
    let mut parent_edge: Vec<Option<usize>> = vec![None; n];
    for root in 0..n {
        if comp[root] != NONE {
            continue;
        }
        comp[root] = root;
        parent[root] = root;
        let mut queue = std::collections::VecDeque::from([root]);
        while let Some(v) = queue.pop_front() {
            for &(next, via) in &adj[v] {
                if comp[next] == NONE {
                    comp[next] = root;
                    depth[next] = depth[v] + 1;
                    parent[next] = v;
                    parent_edge[next] = Some(via);
                    queue.push_back(next);
                }
            }
        }
    }

    // binary lifting: up[k][v] is 2^k steps towards the root, upmax[k][v]
    // the heaviest edge on that stretch
    let levels = (usize::BITS - n.max(2).leading_zeros()) as usize;
    let heavier = |a: Option<usize>, b: Option<usize>| match (a, b) {
        (Some(a), Some(b)) => {
            if greater(weights[b], weights[a]) {
                Some(b)
            } else {
                Some(a)
            }
        }
        (a, None) => a,
        (None, b) => b,
    };
    let mut up = vec![parent; 1];
    let mut upmax = vec![parent_edge; 1];
    for k in 1..levels {
        let (prev_up, prev_max) = (&up[k - 1], &upmax[k - 1]);
        let mut next_up = Vec::with_capacity(n);
        let mut next_max = Vec::with_capacity(n);
        for v in 0..n {
            next_up.push(prev_up[prev_up[v]]);
            next_max.push(heavier(prev_max[v], prev_max[prev_up[v]]));
        }
        up.push(next_up);
        upmax.push(next_max);
    }

    let path_max = |mut u: usize, mut v: usize| -> Option<usize> {
        let mut best = None;
        if depth[u] < depth[v] {
            core::mem::swap(&mut u, &mut v);
        }
        let mut diff = depth[u] - depth[v];
        let mut k = 0;
        while diff > 0 {
            if diff & 1 == 1 {
                best = heavier(best, upmax[k][u]);
                u = up[k][u];
            }
            diff >>= 1;
            k += 1;
        }
        if u == v {
            return best;
        }
        for k in (0..levels).rev() {
            if up[k][u] != up[k][v] {
                best = heavier(best, upmax[k][u]);
                best = heavier(best, upmax[k][v]);
                u = up[k][u];
                v = up[k][v];
            }
        }
        best = heavier(best, upmax[0][u]);
        heavier(best, upmax[0][v])
    };

    let mut light = FixedBitSet::with_capacity(m);
    for e in graph.edges() {
        if in_f1.contains(e) {
            light.insert(e);
            continue;
        }
        let (s, t) = graph.edge_endpoints(e);
        if comp[s] != comp[t] {
            light.insert(e);
            continue;
        }
        match path_max(s, t) {
            Some(max_edge) if greater(weights[e], weights[max_edge]) => {}
            _ => {
                light.insert(e);
            }
        }
    }
    light
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index_graph::GraphHints;

    #[test]
    fn matches_kruskal_on_random_graphs() {
        let mut rng = StdRng::seed_from_u64(23);
        for round in 0..20 {
            let n = rng.gen_range(2..40);
            let mut g = IndexGraph::new_undirected(GraphHints {
                allow_parallel_edges: true,
                ..GraphHints::default()
            });
            g.add_vertices(n);
            let mut w = Vec::new();
            for _ in 0..rng.gen_range(0..150) {
                let u = rng.gen_range(0..n);
                let v = rng.gen_range(0..n);
                if u != v {
                    g.add_edge(u, v).unwrap();
                    w.push(rng.gen_range(0..200) as f64);
                }
            }
            let randomized = karger_klein_tarjan(&g, |e| w[e], Some(round)).unwrap();
            let k = kruskal(&g, |e| w[e]).unwrap();
            assert_eq!(randomized.len(), k.len());
            assert_eq!(
                randomized.total_weight(|e| w[e]),
                k.total_weight(|e| w[e])
            );
        }
    }

    #[test]
    fn light_edge_filter_keeps_forest_and_cross_edges() {
        let mut g = IndexGraph::new_undirected(GraphHints::default());
        g.add_vertices(4);
        let w = [1.0, 1.0, 10.0, 2.0];
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 2).unwrap();
        g.add_edge(0, 2).unwrap();
        g.add_edge(2, 3).unwrap();
        // forest {0-1, 1-2}: the 10.0 chord is heavy, the cross edge light
        let light = light_edges(&g, &w, &[0, 1]);
        assert!(light.contains(0));
        assert!(light.contains(1));
        assert!(!light.contains(2));
        assert!(light.contains(3));
    }
}
