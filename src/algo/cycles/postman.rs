//! The Chinese postman tour: a minimum-weight closed walk covering every
//! edge of an undirected graph at least once.

use log::debug;

use crate::algo::shortest_paths::{dijkstra, ShortestPathTree};
use crate::error::{GraphError, Result};
use crate::index_graph::IndexGraph;
use crate::path::Path;
use crate::unionfind::UnionFind;

/// Compute a Chinese postman tour.
///
/// Odd-degree vertices are paired up by a minimum-weight perfect matching
/// over their shortest-path distances; the matched paths are duplicated and
/// the resulting even multigraph is traversed with Hierholzer's circuit
/// construction.
///
/// The matching is an exact bitmask dynamic program, exponential in the
/// number of odd vertices; the tour is intended for graphs with at most a
/// couple dozen of them.
///
/// # Arguments
/// * `graph`: an undirected graph with all edges in one connected
///   component.
/// * `weight`: non-negative weight per edge index.
///
/// # Returns
/// * `Some(tour)`: a closed walk visiting every edge, as a [`Path`] cycle.
///   Duplicated stretches repeat the underlying edge index.
/// * `None`: the edges span more than one component, so no closed walk
///   covers them all.
pub fn chinese_postman<'a>(
    graph: &'a IndexGraph,
    mut weight: impl FnMut(usize) -> f64,
) -> Result<Option<Path<'a>>> {
    if graph.is_directed() {
        return Err(GraphError::DirectedGraphRejected);
    }
    let n = graph.vertex_count();
    let m = graph.edge_count();
    if m == 0 {
        if n == 0 {
            return Ok(None);
        }
        return Ok(Some(Path::new(graph, 0, 0, Vec::new())?));
    }

    // every edge must live in one component
    let mut uf = UnionFind::new(n);
    let mut degree = vec![0usize; n];
    for e in graph.edges() {
        let (s, t) = graph.edge_endpoints(e);
        uf.union(s, t);
        degree[s] += 1;
        degree[t] += 1;
    }
    let anchor = graph.edge_source(0);
    for v in 0..n {
        if degree[v] > 0 && !uf.equiv(anchor, v) {
            return Ok(None);
        }
    }

    let odd: Vec<usize> = (0..n).filter(|&v| degree[v] % 2 == 1).collect();
    debug!("postman: {} odd vertices", odd.len());
    let trees: Vec<ShortestPathTree<'_>> = odd
        .iter()
        .map(|&v| dijkstra(graph, v, &mut weight))
        .collect::<Result<_>>()?;

    // minimum-weight perfect matching of the odd vertices over shortest
    // path distances, by bitmask dynamic program
    let k = odd.len();
    let mut duplicated: Vec<usize> = Vec::new();
    if k > 0 {
        let full = 1usize << k;
        let mut dp = vec![f64::INFINITY; full];
        let mut pair_choice = vec![(0usize, 0usize); full];
        dp[0] = 0.0;
        for mask in 1..full {
            let i = mask.trailing_zeros() as usize;
            let rest = mask & !(1 << i);
            let mut j_bits = rest;
            while j_bits != 0 {
                let j = j_bits.trailing_zeros() as usize;
                j_bits &= j_bits - 1;
                let prev = rest & !(1 << j);
                let candidate = dp[prev] + trees[i].distance(odd[j]);
                if candidate < dp[mask] {
                    dp[mask] = candidate;
                    pair_choice[mask] = (i, j);
                }
            }
        }
        let mut mask = full - 1;
        while mask != 0 {
            let (i, j) = pair_choice[mask];
            let path = trees[i]
                .path(odd[j])
                .ok_or(GraphError::InvariantViolated("odd vertices share a component"))?;
            duplicated.extend_from_slice(path.edges());
            mask &= !(1 << i);
            mask &= !(1 << j);
        }
    }

    // Hierholzer over the even multigraph: one copy per edge plus the
    // duplicated stretches
    let mut copies: Vec<usize> = graph.edges().collect();
    copies.extend_from_slice(&duplicated);
    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (c, &e) in copies.iter().enumerate() {
        let (s, t) = graph.edge_endpoints(e);
        adj[s].push(c);
        if t != s {
            adj[t].push(c);
        }
    }
    let start = anchor;
    let mut used = vec![false; copies.len()];
    let mut ptr = vec![0usize; n];
    let mut stack: Vec<(usize, Option<usize>)> = vec![(start, None)];
    let mut tour = Vec::with_capacity(copies.len());
    while let Some(&(v, via)) = stack.last() {
        let mut advanced = false;
        while ptr[v] < adj[v].len() {
            let c = adj[v][ptr[v]];
            if used[c] {
                ptr[v] += 1;
                continue;
            }
            used[c] = true;
            let next = graph
                .edge_endpoint(copies[c], v)
                .expect("incidence lists touch their vertex");
            stack.push((next, Some(c)));
            advanced = true;
            break;
        }
        if !advanced {
            stack.pop();
            if let Some(c) = via {
                tour.push(copies[c]);
            }
        }
    }
    tour.reverse();
    debug_assert_eq!(tour.len(), copies.len());
    Ok(Some(Path::new(graph, start, start, tour)?))
}
