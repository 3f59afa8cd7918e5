//! Minimum mean cycle: Howard's policy iteration and the Dasdan-Gupta
//! (Karp-style) dynamic program.
//!
//! Both take a directed graph with finite `f64` edge weights and return a
//! cycle minimizing total weight divided by length, or `None` for acyclic
//! graphs. Disconnected graphs are handled by working per strongly
//! connected component.

use log::trace;

use crate::algo::connectivity::tarjan_scc;
use crate::error::{GraphError, Result};
use crate::index_graph::IndexGraph;
use crate::path::Path;

const EPS: f64 = 1e-9;
const NONE: usize = usize::MAX;

fn check_directed(graph: &IndexGraph) -> Result<()> {
    if !graph.is_directed() {
        return Err(GraphError::UndirectedGraphRejected);
    }
    Ok(())
}

/// Minimum mean cycle by the Dasdan-Gupta refinement of Karp's dynamic
/// program.
///
/// Per strongly connected component, `D[k][v]` is the minimum weight of a
/// walk of exactly `k` edges from a fixed source; the minimum cycle mean is
/// `min_v max_k (D[n][v] - D[k][v]) / (n - k)` and a cycle achieving it is
/// read off the critical walk.
///
/// # Returns
/// * `Some(cycle)`: a minimum-mean cycle as a [`Path`].
/// * `None`: the graph is acyclic.
///
/// # Complexity
/// * Time complexity: **O(|V| |E|)**.
/// * Auxiliary space: **O(|V|²)**.
pub fn minimum_mean_cycle_dasdan_gupta<'a>(
    graph: &'a IndexGraph,
    mut weight: impl FnMut(usize) -> f64,
) -> Result<Option<Path<'a>>> {
    check_directed(graph)?;
    let n = graph.vertex_count();
    if n == 0 {
        return Ok(None);
    }
    let w: Vec<f64> = graph.edges().map(&mut weight).collect();
    debug_assert!(w.iter().all(|x| x.is_finite()), "weights must be finite");

    let (comp, count) = tarjan_scc(graph, None);
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); count];
    for v in 0..n {
        members[comp[v]].push(v);
    }

    let mut best: Option<(f64, usize, Vec<usize>)> = None;
    for c in 0..count {
        let verts = &members[c];
        let mut edges_c = Vec::new();
        for &v in verts {
            for &e in graph.out_edges(v) {
                if comp[graph.edge_target(e)] == c {
                    edges_c.push(e);
                }
            }
        }
        if edges_c.is_empty() {
            continue;
        }
        let nl = verts.len();
        let mut local = vec![NONE; n];
        for (i, &v) in verts.iter().enumerate() {
            local[v] = i;
        }

        // Karp table from the component's first vertex
        let mut dist = vec![vec![f64::INFINITY; nl]; nl + 1];
        let mut parent = vec![vec![NONE; nl]; nl + 1];
        dist[0][0] = 0.0;
        for k in 1..=nl {
            for &e in &edges_c {
                let u = local[graph.edge_source(e)];
                let t = local[graph.edge_target(e)];
                let candidate = dist[k - 1][u] + w[e];
                if candidate < dist[k][t] {
                    dist[k][t] = candidate;
                    parent[k][t] = e;
                }
            }
        }

        let mut lambda = f64::INFINITY;
        let mut arg = NONE;
        for t in 0..nl {
            if !dist[nl][t].is_finite() {
                continue;
            }
            let mut worst = f64::NEG_INFINITY;
            for k in 0..nl {
                if dist[k][t].is_finite() {
                    let ratio = (dist[nl][t] - dist[k][t]) / (nl - k) as f64;
                    worst = worst.max(ratio);
                }
            }
            if worst < lambda {
                lambda = worst;
                arg = t;
            }
        }
        if arg == NONE {
            continue;
        }
        trace!("dasdan-gupta: component {c} lambda {lambda}");

        // walk the critical path backwards and cut out a cycle
        let mut verts_walk = vec![NONE; nl + 1];
        let mut edges_walk = vec![NONE; nl + 1];
        let mut at = arg;
        for k in (1..=nl).rev() {
            verts_walk[k] = at;
            let e = parent[k][at];
            edges_walk[k] = e;
            at = local[graph.edge_source(e)];
        }
        verts_walk[0] = at;
        let mut first_seen = vec![NONE; nl];
        let (mut i, mut j) = (NONE, NONE);
        for (pos, &v) in verts_walk.iter().enumerate() {
            if first_seen[v] != NONE {
                i = first_seen[v];
                j = pos;
                break;
            }
            first_seen[v] = pos;
        }
        let cycle: Vec<usize> = edges_walk[i + 1..=j].to_vec();
        let mean = cycle.iter().map(|&e| w[e]).sum::<f64>() / cycle.len() as f64;
        let root = verts[verts_walk[i]];
        if best.as_ref().map_or(true, |(m, _, _)| mean < *m) {
            best = Some((mean, root, cycle));
        }
    }

    build_cycle(graph, best)
}

/// Minimum mean cycle by Howard's policy iteration.
///
/// Every vertex that can still reach a cycle keeps one chosen out-edge (the
/// policy); evaluating the policy yields per-vertex cycle means and bias
/// values, and the policy is improved greedily until no edge offers a
/// better mean or bias. Each iteration costs **O(|V| + |E|)**.
///
/// # Returns
/// * `Some(cycle)`: a minimum-mean cycle as a [`Path`].
/// * `None`: the graph is acyclic.
pub fn minimum_mean_cycle_howard<'a>(
    graph: &'a IndexGraph,
    mut weight: impl FnMut(usize) -> f64,
) -> Result<Option<Path<'a>>> {
    check_directed(graph)?;
    let n = graph.vertex_count();
    if n == 0 {
        return Ok(None);
    }
    let w: Vec<f64> = graph.edges().map(&mut weight).collect();
    debug_assert!(w.iter().all(|x| x.is_finite()), "weights must be finite");

    // drop vertices that cannot reach a cycle
    let mut alive = vec![true; n];
    let mut out_live: Vec<usize> = (0..n).map(|v| graph.out_edges(v).len()).collect();
    let mut queue: Vec<usize> = (0..n).filter(|&v| out_live[v] == 0).collect();
    while let Some(v) = queue.pop() {
        alive[v] = false;
        for &e in graph.in_edges(v) {
            let u = graph.edge_source(e);
            if alive[u] {
                out_live[u] -= 1;
                if out_live[u] == 0 {
                    queue.push(u);
                }
            }
        }
    }
    if !alive.iter().any(|&a| a) {
        return Ok(None);
    }

    // initial policy: cheapest out-edge into the live part
    let mut policy = vec![NONE; n];
    for v in 0..n {
        if !alive[v] {
            continue;
        }
        for &e in graph.out_edges(v) {
            if !alive[graph.edge_target(e)] {
                continue;
            }
            if policy[v] == NONE
                || (w[e], e) < (w[policy[v]], policy[v])
            {
                policy[v] = e;
            }
        }
    }

    let mut mu = vec![f64::INFINITY; n];
    let mut d = vec![0.0; n];
    let max_iterations = 64 + n * graph.edge_count();
    for iteration in 0..max_iterations {
        evaluate_policy(graph, &w, &policy, &alive, &mut mu, &mut d);
        let mut improved = false;
        for v in 0..n {
            if !alive[v] {
                continue;
            }
            for &e in graph.out_edges(v) {
                let t = graph.edge_target(e);
                if !alive[t] {
                    continue;
                }
                if mu[t] + EPS < mu[v] {
                    policy[v] = e;
                    improved = true;
                } else if (mu[t] - mu[v]).abs() <= EPS && w[e] - mu[v] + d[t] + EPS < d[v] {
                    policy[v] = e;
                    improved = true;
                }
            }
        }
        if !improved {
            trace!("howard converged after {iteration} iterations");
            break;
        }
    }

    // the optimal cycle is in the final policy graph
    let mut state = vec![0u8; n];
    let mut best: Option<(f64, usize, Vec<usize>)> = None;
    for start in 0..n {
        if !alive[start] || state[start] != 0 {
            continue;
        }
        let mut walk = Vec::new();
        let mut at = start;
        while state[at] == 0 {
            state[at] = 1;
            walk.push(at);
            at = graph.edge_target(policy[at]);
        }
        if state[at] == 1 {
            let i = walk.iter().position(|&v| v == at).expect("cycle entry on walk");
            let cycle: Vec<usize> = walk[i..].iter().map(|&v| policy[v]).collect();
            let mean = cycle.iter().map(|&e| w[e]).sum::<f64>() / cycle.len() as f64;
            if best.as_ref().map_or(true, |(m, _, _)| mean < *m) {
                best = Some((mean, at, cycle));
            }
        }
        for v in walk {
            state[v] = 2;
        }
    }

    build_cycle(graph, best)
}

// evaluate the policy's functional graph: cycle means and bias values
fn evaluate_policy(
    graph: &IndexGraph,
    w: &[f64],
    policy: &[usize],
    alive: &[bool],
    mu: &mut [f64],
    d: &mut [f64],
) {
    let n = graph.vertex_count();
    let mut state = vec![0u8; n];
    for start in 0..n {
        if !alive[start] || state[start] != 0 {
            continue;
        }
        let mut walk = Vec::new();
        let mut at = start;
        while alive[at] && state[at] == 0 {
            state[at] = 1;
            walk.push(at);
            at = graph.edge_target(policy[at]);
        }
        if state[at] == 1 {
            // closed a new cycle; fix its mean and bias
            let i = walk.iter().position(|&v| v == at).expect("cycle entry on walk");
            let cycle = &walk[i..];
            let total: f64 = cycle.iter().map(|&v| w[policy[v]]).sum();
            let mean = total / cycle.len() as f64;
            for &v in cycle {
                mu[v] = mean;
            }
            d[at] = 0.0;
            for j in (1..cycle.len()).rev() {
                let v = cycle[j];
                let next = graph.edge_target(policy[v]);
                d[v] = w[policy[v]] - mean + d[next];
            }
            // the prefix chains into the cycle
            for j in (0..i).rev() {
                let v = walk[j];
                let next = graph.edge_target(policy[v]);
                mu[v] = mu[next];
                d[v] = w[policy[v]] - mu[next] + d[next];
            }
        } else {
            // ran into an already-evaluated region
            for j in (0..walk.len()).rev() {
                let v = walk[j];
                let next = graph.edge_target(policy[v]);
                mu[v] = mu[next];
                d[v] = w[policy[v]] - mu[next] + d[next];
            }
        }
        for v in walk {
            state[v] = 2;
        }
    }
}

fn build_cycle(
    graph: &IndexGraph,
    best: Option<(f64, usize, Vec<usize>)>,
) -> Result<Option<Path<'_>>> {
    match best {
        Some((_, root, edges)) => Ok(Some(Path::new(graph, root, root, edges)?)),
        None => Ok(None),
    }
}
