//! Yao's bucketed variant of Borůvka's minimum spanning forest.

use super::{check_undirected, edge_less, MstResult};
use crate::error::Result;
use crate::index_graph::IndexGraph;
use crate::unionfind::UnionFind;

/// Compute a minimum spanning forest with Yao's algorithm.
///
/// Each vertex pre-partitions its incident edges into `⌈log₂ |V|⌉` buckets
/// of roughly equal size, ordered by weight: every edge in bucket `i` is no
/// heavier than any edge in bucket `i + 1`. During the Borůvka-style rounds
/// a vertex's lightest outgoing edge is then found in its first bucket that
/// still holds a non-internal edge, and internal edges are discarded for
/// good as they are encountered.
///
/// # Arguments
/// * `graph`: an undirected graph.
/// * `weight`: weight per edge index.
///
/// # Returns
/// * [`MstResult`]: the forest's edge set.
///
/// # Complexity
/// * Time complexity: **O(|E| log log |V| + |V| log |V|)**.
/// * Auxiliary space: **O(|V| + |E|)**.
pub fn yao<W: Copy + PartialOrd>(
    graph: &IndexGraph,
    mut weight: impl FnMut(usize) -> W,
) -> Result<MstResult> {
    check_undirected(graph)?;
    let n = graph.vertex_count();
    if n == 0 {
        return Ok(MstResult::new(Vec::new()));
    }
    let weights: Vec<W> = graph.edges().map(&mut weight).collect();
    let bucket_count = usize::BITS as usize - (n.max(2) - 1).leading_zeros() as usize;
    let mut buckets: Vec<Vec<Vec<usize>>> = graph
        .vertices()
        .map(|v| split_buckets(graph.out_edges(v).to_vec(), &weights, bucket_count))
        .collect();
    // first bucket of each vertex that may still hold an external edge
    let mut first = vec![0usize; n];

    let mut trees = UnionFind::new(n);
    let mut forest = Vec::new();
    loop {
        let mut cheapest = vec![usize::MAX; n];
        for v in 0..n {
            let Some(e) = lightest_external(graph, &weights, &mut buckets[v], &mut first[v], &mut trees)
            else {
                continue;
            };
            let r = trees.find_mut(v);
            if cheapest[r] == usize::MAX || edge_less(&weights, e, cheapest[r]) {
                cheapest[r] = e;
            }
        }
        let mut merged = false;
        for r in 0..n {
            let e = cheapest[r];
            if e == usize::MAX {
                continue;
            }
            let (s, t) = graph.edge_endpoints(e);
            if trees.union(s, t) {
                forest.push(e);
                merged = true;
            }
        }
        if !merged {
            break;
        }
    }
    Ok(MstResult::new(forest))
}

// quantile split: every edge of bucket i compares <= every edge of bucket i+1
fn split_buckets<W: Copy + PartialOrd>(
    mut edges: Vec<usize>,
    weights: &[W],
    bucket_count: usize,
) -> Vec<Vec<usize>> {
    let len = edges.len();
    let mut out = Vec::with_capacity(bucket_count);
    let mut taken = 0;
    let mut rest: &mut [usize] = &mut edges;
    for b in 0..bucket_count {
        let boundary = (b + 1) * len / bucket_count;
        let take = boundary - taken;
        if take == 0 {
            out.push(Vec::new());
            continue;
        }
        if take < rest.len() {
            let (head, nth, tail) = core::mem::take(&mut rest).select_nth_unstable_by(take - 1, |&a, &b| {
                if edge_less(weights, a, b) {
                    core::cmp::Ordering::Less
                } else {
                    core::cmp::Ordering::Greater
                }
            });
            let mut bucket = head.to_vec();
            bucket.push(*nth);
            out.push(bucket);
            rest = tail;
        } else {
            out.push(rest.to_vec());
            rest = Default::default();
        }
        taken = boundary;
    }
    out
}

// the vertex's minimum-weight edge leaving its current tree, discarding
// internal edges permanently along the way
fn lightest_external<W: Copy + PartialOrd>(
    graph: &IndexGraph,
    weights: &[W],
    buckets: &mut [Vec<usize>],
    first: &mut usize,
    trees: &mut UnionFind,
) -> Option<usize> {
    while *first < buckets.len() {
        let bucket = &mut buckets[*first];
        let mut i = 0;
        while i < bucket.len() {
            let (s, t) = graph.edge_endpoints(bucket[i]);
            if trees.find_mut(s) == trees.find_mut(t) {
                bucket.swap_remove(i);
            } else {
                i += 1;
            }
        }
        if bucket.is_empty() {
            *first += 1;
            continue;
        }
        return bucket
            .iter()
            .copied()
            .reduce(|a, b| if edge_less(weights, b, a) { b } else { a });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::mst::kruskal;
    use crate::index_graph::GraphHints;
    use rand::{Rng, SeedableRng};

    #[test]
    fn matches_kruskal_on_random_graphs() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let n = rng.gen_range(2..30);
            let mut g = IndexGraph::new_undirected(GraphHints {
                allow_parallel_edges: true,
                ..GraphHints::default()
            });
            g.add_vertices(n);
            let mut w = Vec::new();
            for _ in 0..rng.gen_range(0..80) {
                let u = rng.gen_range(0..n);
                let v = rng.gen_range(0..n);
                if u != v {
                    g.add_edge(u, v).unwrap();
                    w.push(rng.gen_range(0..50) as f64);
                }
            }
            let y = yao(&g, |e| w[e]).unwrap();
            let k = kruskal(&g, |e| w[e]).unwrap();
            assert_eq!(y.len(), k.len());
            assert_eq!(y.total_weight(|e| w[e]), k.total_weight(|e| w[e]));
        }
    }

    #[test]
    fn empty_graph() {
        let g = IndexGraph::new_undirected(GraphHints::default());
        assert!(yao(&g, |_| 0.0).unwrap().is_empty());
    }
}
