//! The Fredman-Tarjan minimum spanning forest: Prim-style growth with a
//! bounded heap, interleaved with contraction passes.

use std::collections::BinaryHeap;

use log::trace;

use super::{check_undirected, MstResult};
use crate::error::Result;
use crate::heap::MinScored;
use crate::index_graph::IndexGraph;
use crate::unionfind::UnionFind;

/// Compute a minimum spanning forest with the Fredman-Tarjan algorithm.
///
/// Each pass grows Prim trees from the current super-vertices, but a tree
/// stops growing as soon as its candidate heap exceeds `2^⌈2|E|/nᵢ⌉`
/// entries (`nᵢ` = super-vertex count at the start of the pass) or it runs
/// into a tree grown earlier in the pass. Completed trees are contracted
/// and the next pass runs on the shrunken graph.
///
/// # Arguments
/// * `graph`: an undirected graph.
/// * `weight`: weight per edge index.
///
/// # Returns
/// * [`MstResult`]: the forest's edge set.
///
/// # Complexity
/// * Time complexity: **O(|E| β(|E|, |V|))**.
/// * Auxiliary space: **O(|V| + |E|)**.
pub fn fredman_tarjan<W: Copy + PartialOrd>(
    graph: &IndexGraph,
    mut weight: impl FnMut(usize) -> W,
) -> Result<MstResult> {
    check_undirected(graph)?;
    let n = graph.vertex_count();
    let m = graph.edge_count();
    if n == 0 || m == 0 {
        return Ok(MstResult::new(Vec::new()));
    }
    let weights: Vec<W> = graph.edges().map(&mut weight).collect();
    let mut trees = UnionFind::new(n);
    let mut forest: Vec<usize> = Vec::new();

    loop {
        // group vertices by their current tree
        let mut group_of_root = vec![usize::MAX; n];
        let mut group_id = vec![usize::MAX; n];
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for v in 0..n {
            let r = trees.find_mut(v);
            if group_of_root[r] == usize::MAX {
                group_of_root[r] = groups.len();
                groups.push(Vec::new());
            }
            group_id[v] = group_of_root[r];
            groups[group_of_root[r]].push(v);
        }
        let nt = groups.len();
        if nt <= 1 {
            break;
        }
        let exponent = ((2 * m).div_euclid(nt) + usize::from((2 * m) % nt != 0)).min(62);
        let limit = 1usize << exponent;
        trace!("fredman-tarjan pass: {nt} trees, heap limit {limit}");

        let mut visited = vec![false; nt];
        let mut merged_any = false;
        for start in 0..nt {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            let grow_rep = trees.find_mut(groups[start][0]);
            let mut heap: BinaryHeap<MinScored<W, usize>> = BinaryHeap::new();
            push_group_edges(graph, &weights, &groups[start], &mut heap);
            while heap.len() <= limit {
                let Some(MinScored(_, e)) = heap.pop() else {
                    break;
                };
                let (s, t) = graph.edge_endpoints(e);
                if trees.equiv(s, t) {
                    continue;
                }
                // the endpoint still outside the growing tree
                let outside = if trees.find_mut(s) == trees.find_mut(grow_rep) {
                    t
                } else {
                    s
                };
                let other_group = group_id[outside];
                forest.push(e);
                trees.union(s, t);
                merged_any = true;
                if visited[other_group] {
                    // fused into a tree grown earlier this pass
                    break;
                }
                visited[other_group] = true;
                push_group_edges(graph, &weights, &groups[other_group], &mut heap);
            }
        }
        if !merged_any {
            break;
        }
    }
    Ok(MstResult::new(forest))
}

fn push_group_edges<W: Copy + PartialOrd>(
    graph: &IndexGraph,
    weights: &[W],
    members: &[usize],
    heap: &mut BinaryHeap<MinScored<W, usize>>,
) {
    for &v in members {
        for &e in graph.out_edges(v) {
            heap.push(MinScored(weights[e], e));
        }
    }
}
