//! Maximal clique and maximal independent set enumeration
//! (Bron-Kerbosch).

use fixedbitset::FixedBitSet;

use crate::error::{GraphError, Result};
use crate::index_graph::IndexGraph;
use crate::mapping::Id;
use crate::LabelledGraph;

/// Whether the search branches on every candidate or prunes with the
/// Tomita pivot rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CliqueAlgo {
    /// Plain Bron-Kerbosch.
    Plain,
    /// Bron-Kerbosch branching only on candidates not adjacent to a pivot
    /// chosen from `P ∪ X` with the most candidate neighbors. A branch
    /// where some excluded vertex is adjacent to every candidate dies
    /// without descending.
    #[default]
    Pivot,
}

/// Enumerate the maximal cliques of an undirected graph.
///
/// Adjacency is materialized into a dense `n x n` bitmap up front, so
/// adjacency tests inside the search are O(1). The returned iterator is
/// lazy and yields each maximal clique exactly once as an ascending vertex
/// list.
///
/// # Arguments
/// * `graph`: an undirected graph.
/// * `algo`: pivoting rule.
///
/// # Returns
/// * [`MaximalCliques`]: lazy iterator over the maximal cliques.
///
/// # Complexity
/// * Time complexity: **O(3^(|V|/3))** overall; output-sensitive in
///   practice.
/// * Auxiliary space: **O(|V|²)**.
///
/// # Example
/// ```
/// use ixgraph::{GraphHints, IndexGraph};
/// use ixgraph::algo::cliques::{maximal_cliques, CliqueAlgo};
///
/// // K4 minus one edge
/// let mut g = IndexGraph::new_undirected(GraphHints::default());
/// g.add_vertices(4);
/// for (u, v) in [(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)] {
///     g.add_edge(u, v).unwrap();
/// }
/// let cliques: Vec<_> = maximal_cliques(&g, CliqueAlgo::Pivot).unwrap().collect();
/// assert_eq!(cliques, vec![vec![0, 1, 2], vec![1, 2, 3]]);
/// ```
pub fn maximal_cliques(graph: &IndexGraph, algo: CliqueAlgo) -> Result<MaximalCliques> {
    if graph.is_directed() {
        return Err(GraphError::DirectedGraphRejected);
    }
    let n = graph.vertex_count();
    let mut adjacency = vec![FixedBitSet::with_capacity(n); n];
    for e in graph.edges() {
        let (s, t) = graph.edge_endpoints(e);
        if s != t {
            adjacency[s].insert(t);
            adjacency[t].insert(s);
        }
    }
    Ok(MaximalCliques::over(adjacency, algo))
}

/// Enumerate the maximal independent sets of an undirected graph: the
/// maximal cliques of the complement graph.
pub fn maximal_independent_sets(graph: &IndexGraph, algo: CliqueAlgo) -> Result<MaximalCliques> {
    if graph.is_directed() {
        return Err(GraphError::DirectedGraphRejected);
    }
    let n = graph.vertex_count();
    let mut adjacency = Vec::with_capacity(n);
    for v in 0..n {
        let mut row = FixedBitSet::with_capacity(n);
        row.insert_range(..);
        row.set(v, false);
        adjacency.push(row);
    }
    for e in graph.edges() {
        let (s, t) = graph.edge_endpoints(e);
        if s != t {
            adjacency[s].set(t, false);
            adjacency[t].set(s, false);
        }
    }
    Ok(MaximalCliques::over(adjacency, algo))
}

#[derive(Debug)]
struct Frame {
    p: FixedBitSet,
    x: FixedBitSet,
    // candidates this frame still has to branch on
    todo: Vec<usize>,
    next: usize,
    reported: bool,
}

/// Lazy iterator over maximal cliques; see [`maximal_cliques`].
#[derive(Debug)]
pub struct MaximalCliques {
    adjacency: Vec<FixedBitSet>,
    algo: CliqueAlgo,
    // current clique, one vertex pushed per frame below the root
    r: Vec<usize>,
    frames: Vec<Frame>,
}

impl MaximalCliques {
    fn over(adjacency: Vec<FixedBitSet>, algo: CliqueAlgo) -> Self {
        let n = adjacency.len();
        let mut frames = Vec::new();
        if n > 0 {
            let mut p = FixedBitSet::with_capacity(n);
            p.insert_range(..);
            let x = FixedBitSet::with_capacity(n);
            frames.push(Self::frame(&adjacency, algo, p, x));
        }
        MaximalCliques {
            adjacency,
            algo,
            r: Vec::new(),
            frames,
        }
    }

    fn frame(adjacency: &[FixedBitSet], algo: CliqueAlgo, p: FixedBitSet, x: FixedBitSet) -> Frame {
        let todo = match algo {
            CliqueAlgo::Plain => p.ones().collect(),
            CliqueAlgo::Pivot => {
                // branch only on candidates that do not neighbor the pivot
                let pivot = p
                    .ones()
                    .chain(x.ones())
                    .max_by_key(|&u| adjacency[u].ones().filter(|&w| p.contains(w)).count());
                match pivot {
                    Some(u) => p.ones().filter(|&v| !adjacency[u].contains(v)).collect(),
                    None => Vec::new(),
                }
            }
        };
        Frame {
            p,
            x,
            todo,
            next: 0,
            reported: false,
        }
    }
}

impl Iterator for MaximalCliques {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        loop {
            let frame = self.frames.last_mut()?;
            if !frame.reported {
                frame.reported = true;
                if frame.p.count_ones(..) == 0 && frame.x.count_ones(..) == 0 {
                    // no candidate extends R and nothing explored covers it
                    let mut clique = self.r.clone();
                    clique.sort_unstable();
                    return Some(clique);
                }
            }
            if frame.next < frame.todo.len() {
                let v = frame.todo[frame.next];
                frame.next += 1;
                if !frame.p.contains(v) {
                    continue;
                }
                let mut child_p = frame.p.clone();
                child_p.intersect_with(&self.adjacency[v]);
                let mut child_x = frame.x.clone();
                child_x.intersect_with(&self.adjacency[v]);
                frame.p.set(v, false);
                frame.x.insert(v);
                self.r.push(v);
                let child = Self::frame(&self.adjacency, self.algo, child_p, child_x);
                self.frames.push(child);
                continue;
            }
            self.frames.pop();
            if !self.frames.is_empty() {
                self.r.pop();
            }
        }
    }
}

/// Labelled façade over [`maximal_cliques`]: cliques come back as vertex
/// identifier lists.
pub fn maximal_cliques_labelled<'a, V: Id, E: Id>(
    graph: &'a LabelledGraph<V, E>,
    algo: CliqueAlgo,
) -> Result<impl Iterator<Item = Vec<V>> + 'a> {
    let iter = maximal_cliques(graph.index_graph(), algo)?;
    Ok(iter.map(move |clique| {
        clique
            .into_iter()
            .map(|v| graph.vertex_id(v).clone())
            .collect()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index_graph::GraphHints;
    use itertools::Itertools;

    fn undirected(n: usize, edges: &[(usize, usize)]) -> IndexGraph {
        let mut g = IndexGraph::new_undirected(GraphHints::default());
        g.add_vertices(n);
        for &(u, v) in edges {
            g.add_edge(u, v).unwrap();
        }
        g
    }

    fn collect_sorted(iter: MaximalCliques) -> Vec<Vec<usize>> {
        iter.sorted().collect()
    }

    #[test]
    fn k4_minus_an_edge() {
        let g = undirected(4, &[(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)]);
        for algo in [CliqueAlgo::Plain, CliqueAlgo::Pivot] {
            let cliques = collect_sorted(maximal_cliques(&g, algo).unwrap());
            assert_eq!(cliques, vec![vec![0, 1, 2], vec![1, 2, 3]]);
        }
    }

    #[test]
    fn isolated_vertices_are_cliques() {
        let g = undirected(5, &[(0, 2), (2, 3)]);
        let cliques = collect_sorted(maximal_cliques(&g, CliqueAlgo::Pivot).unwrap());
        assert_eq!(cliques, vec![vec![0, 2], vec![1], vec![2, 3], vec![4]]);
    }

    #[test]
    fn both_rules_agree_on_random_graphs() {
        use rand::{Rng, SeedableRng};
        let mut rng = rand::rngs::StdRng::seed_from_u64(17);
        for _ in 0..20 {
            let n = rng.gen_range(1..12);
            let mut edges = Vec::new();
            for u in 0..n {
                for v in (u + 1)..n {
                    if rng.gen_bool(0.4) {
                        edges.push((u, v));
                    }
                }
            }
            let g = undirected(n, &edges);
            let plain = collect_sorted(maximal_cliques(&g, CliqueAlgo::Plain).unwrap());
            let pivot = collect_sorted(maximal_cliques(&g, CliqueAlgo::Pivot).unwrap());
            assert_eq!(plain, pivot);
            // every reported clique is maximal
            for clique in &plain {
                for u in clique.iter().copied() {
                    for v in clique.iter().copied() {
                        assert!(u == v || g.contains_edge(u, v));
                    }
                }
                for w in 0..n {
                    if !clique.contains(&w) {
                        assert!(!clique.iter().all(|&u| g.contains_edge(u, w)));
                    }
                }
            }
        }
    }

    #[test]
    fn independent_sets_are_complement_cliques() {
        // path 0-1-2-3
        let g = undirected(4, &[(0, 1), (1, 2), (2, 3)]);
        let sets = collect_sorted(maximal_independent_sets(&g, CliqueAlgo::Pivot).unwrap());
        assert_eq!(sets, vec![vec![0, 2], vec![0, 3], vec![1, 3]]);
    }

    #[test]
    fn directed_graphs_are_rejected() {
        let g = IndexGraph::new_directed(GraphHints::default());
        assert_eq!(
            maximal_cliques(&g, CliqueAlgo::Pivot).unwrap_err(),
            GraphError::DirectedGraphRejected
        );
    }

    #[test]
    fn empty_graph_has_no_cliques() {
        let g = undirected(0, &[]);
        assert_eq!(maximal_cliques(&g, CliqueAlgo::Pivot).unwrap().count(), 0);
    }
}
