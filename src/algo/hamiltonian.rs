//! Hamiltonian path and cycle enumeration (Frank Rubin's search).
//!
//! The algorithms implemented here are based on:
//! Rubin, Frank (1974), "A Search Procedure for Hamilton Paths and
//! Circuits", *Journal of the ACM*, **21** (4): 576-80,
//! doi:[10.1145/321850.321854](https://doi.org/10.1145%2F321850.321854)
//!
//! The search walks edges depth-first while classifying the remaining
//! edges as *required* (every completion must use them) or *deleted*
//! (no completion can). Classification decisions are logged per search
//! depth and rewound exactly on backtrack; adjacency is kept in
//! doubly-linked arc lists so a deleted edge unlinks and relinks in O(1).
//! Exhaustive search is exponential in the worst case, but the
//! admissibility checks prune most dead branches early; graphs of a few
//! dozen vertices are usually fine.
//!
//! Hamiltonian paths are found by closing the graph with a virtual vertex
//! adjacent to everything: cycles through the virtual vertex correspond
//! one-to-one to Hamiltonian paths of the original graph.

use fixedbitset::FixedBitSet;
use hashbrown::HashSet;
use log::trace;

use crate::error::{GraphError, Result};
use crate::index_graph::IndexGraph;
use crate::path::Path;

const NONE: usize = usize::MAX;

/// Enumerate the Hamiltonian cycles of a directed or undirected graph.
///
/// The returned iterator is lazy; each cycle is yielded exactly once as a
/// [`Path`] rooted at vertex 0 (undirected cycles are not repeated in the
/// opposite orientation). Self-loops are ignored; parallel edges are
/// rejected with [`GraphError::ParallelEdgesRejected`].
///
/// # Example
/// ```
/// use ixgraph::{GraphHints, IndexGraph};
/// use ixgraph::algo::hamiltonian::hamiltonian_cycles;
///
/// // the full digraph on three vertices
/// let mut g = IndexGraph::new_directed(GraphHints::default());
/// g.add_vertices(3);
/// for (u, v) in [(0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1)] {
///     g.add_edge(u, v).unwrap();
/// }
/// let cycles: Vec<_> = hamiltonian_cycles(&g).unwrap().collect();
/// assert_eq!(cycles.len(), 2);
/// ```
pub fn hamiltonian_cycles(graph: &IndexGraph) -> Result<HamiltonianCycles<'_>> {
    check_no_parallel(graph)?;
    let endpoints: Vec<(usize, usize)> = graph.edges().map(|e| graph.edge_endpoints(e)).collect();
    let searcher = Searcher::new(graph.vertex_count(), endpoints, graph.is_directed(), 0);
    Ok(HamiltonianCycles { graph, searcher })
}

/// Enumerate the Hamiltonian paths of a directed or undirected graph.
///
/// Same contract as [`hamiltonian_cycles`]; every path covering all
/// vertices is yielded exactly once (undirected paths in one of their two
/// directions).
pub fn hamiltonian_paths(graph: &IndexGraph) -> Result<HamiltonianPaths<'_>> {
    check_no_parallel(graph)?;
    let n = graph.vertex_count();
    let m = graph.edge_count();
    // virtual closing vertex n, adjacent to everything
    let mut endpoints: Vec<(usize, usize)> =
        graph.edges().map(|e| graph.edge_endpoints(e)).collect();
    for v in 0..n {
        endpoints.push((v, n));
        if graph.is_directed() {
            endpoints.push((n, v));
        }
    }
    let searcher = Searcher::new(n + 1, endpoints, graph.is_directed(), n);
    Ok(HamiltonianPaths {
        graph,
        searcher,
        real_edges: m,
        trivial_pending: n == 1,
    })
}

fn check_no_parallel(graph: &IndexGraph) -> Result<()> {
    let mut seen = HashSet::with_capacity(graph.edge_count());
    for e in graph.edges() {
        let (s, t) = graph.edge_endpoints(e);
        let key = if graph.is_directed() || s <= t {
            (s, t)
        } else {
            (t, s)
        };
        if !seen.insert(key) {
            return Err(GraphError::ParallelEdgesRejected { u: s, v: t });
        }
    }
    Ok(())
}

/// Lazy iterator over Hamiltonian cycles; see [`hamiltonian_cycles`].
#[derive(Debug)]
pub struct HamiltonianCycles<'a> {
    graph: &'a IndexGraph,
    searcher: Searcher,
}

impl<'a> Iterator for HamiltonianCycles<'a> {
    type Item = Path<'a>;

    fn next(&mut self) -> Option<Path<'a>> {
        let edges = self.searcher.next_cycle()?;
        Some(
            Path::new(self.graph, self.searcher.origin, self.searcher.origin, edges)
                .expect("search emits chained cycles"),
        )
    }
}

/// Lazy iterator over Hamiltonian paths; see [`hamiltonian_paths`].
pub struct HamiltonianPaths<'a> {
    graph: &'a IndexGraph,
    searcher: Searcher,
    real_edges: usize,
    trivial_pending: bool,
}

impl<'a> Iterator for HamiltonianPaths<'a> {
    type Item = Path<'a>;

    fn next(&mut self) -> Option<Path<'a>> {
        if self.trivial_pending {
            self.trivial_pending = false;
            return Some(Path::new(self.graph, 0, 0, Vec::new()).expect("single-vertex path"));
        }
        if self.graph.vertex_count() <= 1 {
            return None;
        }
        let cycle = self.searcher.next_cycle()?;
        // strip the two virtual edges off the augmented cycle
        debug_assert!(cycle.len() >= 3);
        let first = cycle[0];
        let last = cycle[cycle.len() - 1];
        debug_assert!(first >= self.real_edges && last >= self.real_edges);
        let edges: Vec<usize> = cycle[1..cycle.len() - 1].to_vec();
        debug_assert!(edges.iter().all(|&e| e < self.real_edges));
        let virtual_vertex = self.searcher.origin;
        let source = other_endpoint(self.searcher.endpoints[first], virtual_vertex);
        let target = other_endpoint(self.searcher.endpoints[last], virtual_vertex);
        Some(Path::new(self.graph, source, target, edges).expect("search emits chained paths"))
    }
}

fn other_endpoint(endpoints: (usize, usize), v: usize) -> usize {
    if endpoints.0 == v {
        endpoints.1
    } else {
        endpoints.0
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Status {
    Undecided,
    Required,
    Deleted,
}

#[derive(Debug)]
enum Op {
    Required(usize),
    Deleted(usize),
}

#[derive(Debug)]
struct Frame {
    vertex: usize,
    // history length when this frame was entered; rewound on backtrack
    mark: usize,
    // the one edge this frame may use, when propagation decided it
    forced: usize,
    tried_forced: bool,
    // last arc handed out of the vertex's arc list
    cursor: usize,
    started: bool,
}

// The cycle searcher. Arc `2e` is edge `e` in the arc list of its source
// endpoint, arc `2e + 1` in the list of its target endpoint; directed
// graphs keep separate out/in lists, undirected graphs a single incident
// list per vertex (req_out/req_in then double as the vertex's two
// required-edge slots).
#[derive(Debug)]
struct Searcher {
    n: usize,
    directed: bool,
    origin: usize,
    endpoints: Vec<(usize, usize)>,
    next: Vec<usize>,
    prev: Vec<usize>,
    head_out: Vec<usize>,
    head_in: Vec<usize>,
    out_alive: Vec<usize>,
    in_alive: Vec<usize>,
    status: Vec<Status>,
    req_out: Vec<usize>,
    req_in: Vec<usize>,
    history: Vec<Op>,
    dirty: Vec<usize>,
    visited: FixedBitSet,
    path: Vec<usize>,
    frames: Vec<Frame>,
    done: bool,
    scratch: FixedBitSet,
    queue: Vec<usize>,
}

impl Searcher {
    fn new(n: usize, endpoints: Vec<(usize, usize)>, directed: bool, origin: usize) -> Self {
        let m = endpoints.len();
        let mut searcher = Searcher {
            n,
            directed,
            origin,
            endpoints,
            next: vec![NONE; 2 * m],
            prev: vec![NONE; 2 * m],
            head_out: vec![NONE; n],
            head_in: vec![NONE; n],
            out_alive: vec![0; n],
            in_alive: vec![0; n],
            status: vec![Status::Undecided; m],
            req_out: vec![NONE; n],
            req_in: vec![NONE; n],
            history: Vec::new(),
            dirty: Vec::new(),
            visited: FixedBitSet::with_capacity(n),
            path: Vec::new(),
            frames: Vec::new(),
            done: false,
            scratch: FixedBitSet::with_capacity(n),
            queue: Vec::new(),
        };
        searcher.link_all(m);
        searcher.bootstrap();
        searcher
    }

    fn link_all(&mut self, m: usize) {
        for e in (0..m).rev() {
            let (s, t) = self.endpoints[e];
            if s == t {
                // self-loops can never sit on a Hamiltonian cycle
                self.status[e] = Status::Deleted;
                continue;
            }
            self.link_arc(2 * e);
            self.link_arc(2 * e + 1);
            self.out_alive[s] += 1;
            if self.directed {
                self.in_alive[t] += 1;
            } else {
                self.out_alive[t] += 1;
            }
        }
    }

    fn bootstrap(&mut self) {
        if self.n < 2 {
            self.done = true;
            return;
        }
        self.dirty.extend(0..self.n);
        if !self.process() {
            self.done = true;
            return;
        }
        self.visited.insert(self.origin);
        let mark = self.history.len();
        let root = self.enter_frame(self.origin, NONE, mark);
        self.frames.push(root);
    }

    // -- arc lists ---------------------------------------------------------

    fn arc_vertex(&self, a: usize) -> usize {
        let (s, t) = self.endpoints[a >> 1];
        if a & 1 == 0 {
            s
        } else {
            t
        }
    }

    fn arc_other(&self, a: usize) -> usize {
        let (s, t) = self.endpoints[a >> 1];
        if a & 1 == 0 {
            t
        } else {
            s
        }
    }

    fn head_slot(&mut self, a: usize) -> &mut usize {
        let v = self.arc_vertex(a);
        if self.directed && a & 1 == 1 {
            &mut self.head_in[v]
        } else {
            &mut self.head_out[v]
        }
    }

    fn link_arc(&mut self, a: usize) {
        let head = *self.head_slot(a);
        self.next[a] = head;
        self.prev[a] = NONE;
        if head != NONE {
            self.prev[head] = a;
        }
        *self.head_slot(a) = a;
    }

    fn unlink_arc(&mut self, a: usize) {
        let (p, nx) = (self.prev[a], self.next[a]);
        if p == NONE {
            *self.head_slot(a) = nx;
        } else {
            self.next[p] = nx;
        }
        if nx != NONE {
            self.prev[nx] = p;
        }
    }

    // valid only in exact reverse unlink order
    fn relink_arc(&mut self, a: usize) {
        let (p, nx) = (self.prev[a], self.next[a]);
        if p == NONE {
            *self.head_slot(a) = a;
        } else {
            self.next[p] = a;
        }
        if nx != NONE {
            self.prev[nx] = a;
        }
    }

    // -- classification ----------------------------------------------------

    fn delete_edge(&mut self, e: usize) -> bool {
        match self.status[e] {
            Status::Deleted => true,
            Status::Required => false,
            Status::Undecided => {
                self.status[e] = Status::Deleted;
                self.history.push(Op::Deleted(e));
                self.unlink_arc(2 * e);
                self.unlink_arc(2 * e + 1);
                let (s, t) = self.endpoints[e];
                self.out_alive[s] -= 1;
                if self.directed {
                    self.in_alive[t] -= 1;
                } else {
                    self.out_alive[t] -= 1;
                }
                self.dirty.push(s);
                self.dirty.push(t);
                true
            }
        }
    }

    fn undirected_required_count(&self, v: usize) -> usize {
        usize::from(self.req_out[v] != NONE) + usize::from(self.req_in[v] != NONE)
    }

    fn require_edge(&mut self, e: usize) -> bool {
        match self.status[e] {
            Status::Required => true,
            Status::Deleted => false,
            Status::Undecided => {
                let (u, v) = self.endpoints[e];
                if self.directed {
                    if self.req_out[u] != NONE || self.req_in[v] != NONE {
                        return false;
                    }
                    if !self.required_chain_ok(e) {
                        return false;
                    }
                    self.status[e] = Status::Required;
                    self.history.push(Op::Required(e));
                    self.req_out[u] = e;
                    self.req_in[v] = e;
                    self.dirty.push(u);
                    self.dirty.push(v);
                    // a decided out-edge rules out u's others, ditto v's ins
                    if !self.delete_siblings(self.head_out[u], e) {
                        return false;
                    }
                    if !self.delete_siblings(self.head_in[v], e) {
                        return false;
                    }
                } else {
                    if self.undirected_required_count(u) == 2
                        || self.undirected_required_count(v) == 2
                    {
                        return false;
                    }
                    if !self.required_chain_ok(e) {
                        return false;
                    }
                    self.status[e] = Status::Required;
                    self.history.push(Op::Required(e));
                    for w in [u, v] {
                        if self.req_out[w] == NONE {
                            self.req_out[w] = e;
                        } else {
                            self.req_in[w] = e;
                        }
                    }
                    self.dirty.push(u);
                    self.dirty.push(v);
                    for w in [u, v] {
                        if self.undirected_required_count(w) == 2 && !self.delete_nonrequired(w) {
                            return false;
                        }
                    }
                }
                true
            }
        }
    }

    // required edges must not close a cycle shorter than the full tour
    fn required_chain_ok(&self, e: usize) -> bool {
        let (u, v) = self.endpoints[e];
        let mut length = 1;
        if self.directed {
            let mut at = v;
            while self.req_out[at] != NONE {
                let f = self.req_out[at];
                at = self.endpoints[f].1;
                length += 1;
                if at == u {
                    return length == self.n;
                }
            }
        } else {
            let mut at = u;
            let mut via = e;
            loop {
                let f = if self.req_out[at] != NONE && self.req_out[at] != via {
                    self.req_out[at]
                } else if self.req_in[at] != NONE && self.req_in[at] != via {
                    self.req_in[at]
                } else {
                    break;
                };
                at = other_endpoint(self.endpoints[f], at);
                via = f;
                length += 1;
                if at == v {
                    return length == self.n;
                }
            }
        }
        true
    }

    fn delete_siblings(&mut self, head: usize, keep: usize) -> bool {
        let mut doomed = Vec::new();
        let mut a = head;
        while a != NONE {
            if a >> 1 != keep {
                doomed.push(a >> 1);
            }
            a = self.next[a];
        }
        doomed.into_iter().all(|e| self.delete_edge(e))
    }

    fn delete_nonrequired(&mut self, v: usize) -> bool {
        let mut doomed = Vec::new();
        let mut a = self.head_out[v];
        while a != NONE {
            if self.status[a >> 1] == Status::Undecided {
                doomed.push(a >> 1);
            }
            a = self.next[a];
        }
        doomed.into_iter().all(|e| self.delete_edge(e))
    }

    // degree rules, run to a fixed point
    fn process(&mut self) -> bool {
        while let Some(v) = self.dirty.pop() {
            if self.directed {
                if self.out_alive[v] == 0 || self.in_alive[v] == 0 {
                    return false;
                }
                if self.out_alive[v] == 1 {
                    let e = self.head_out[v] >> 1;
                    if !self.require_edge(e) {
                        return false;
                    }
                }
                if self.in_alive[v] == 1 {
                    let e = self.head_in[v] >> 1;
                    if !self.require_edge(e) {
                        return false;
                    }
                }
            } else {
                if self.out_alive[v] < 2 {
                    return false;
                }
                if self.out_alive[v] == 2 {
                    let first = self.head_out[v];
                    let second = self.next[first];
                    if !self.require_edge(first >> 1) || !self.require_edge(second >> 1) {
                        return false;
                    }
                }
            }
        }
        true
    }

    fn rewind_to(&mut self, mark: usize) {
        while self.history.len() > mark {
            match self.history.pop().expect("history entry") {
                Op::Required(e) => {
                    self.status[e] = Status::Undecided;
                    let (u, v) = self.endpoints[e];
                    if self.directed {
                        self.req_out[u] = NONE;
                        self.req_in[v] = NONE;
                    } else {
                        for w in [u, v] {
                            if self.req_out[w] == e {
                                self.req_out[w] = NONE;
                            } else {
                                debug_assert_eq!(self.req_in[w], e);
                                self.req_in[w] = NONE;
                            }
                        }
                    }
                }
                Op::Deleted(e) => {
                    self.status[e] = Status::Undecided;
                    self.relink_arc(2 * e + 1);
                    self.relink_arc(2 * e);
                    let (s, t) = self.endpoints[e];
                    self.out_alive[s] += 1;
                    if self.directed {
                        self.in_alive[t] += 1;
                    } else {
                        self.out_alive[t] += 1;
                    }
                }
            }
        }
        self.dirty.clear();
    }

    // -- admissibility -----------------------------------------------------

    // every unvisited vertex must stay reachable from the path head, and
    // (directed) must still reach the origin
    fn reachable_ok(&mut self, head: usize) -> bool {
        let unvisited = self.n - self.path.len() - 2;
        if unvisited == 0 {
            return true;
        }
        self.scratch.clear();
        self.queue.clear();
        self.queue.push(head);
        let mut found = 0;
        while let Some(v) = self.queue.pop() {
            let mut a = self.head_out[v];
            while a != NONE {
                let w = self.arc_other(a);
                if !self.visited.contains(w) && !self.scratch.put(w) {
                    found += 1;
                    self.queue.push(w);
                }
                a = self.next[a];
            }
        }
        if found != unvisited {
            return false;
        }
        if self.directed {
            self.scratch.clear();
            self.queue.clear();
            self.queue.push(self.origin);
            let mut found = 0;
            while let Some(v) = self.queue.pop() {
                let mut a = self.head_in[v];
                while a != NONE {
                    let w = self.arc_other(a);
                    if !self.visited.contains(w) && !self.scratch.put(w) {
                        found += 1;
                        self.queue.push(w);
                    }
                    a = self.next[a];
                }
            }
            if found != unvisited {
                return false;
            }
        }
        true
    }

    // -- the search --------------------------------------------------------

    // `mark` is the history length before the edge into `vertex` was
    // committed; backtracking out of the frame rewinds that commitment too
    fn enter_frame(&mut self, vertex: usize, entry_edge: usize, mark: usize) -> Frame {
        let forced = if self.directed {
            self.req_out[vertex]
        } else {
            // a required incident edge other than the one we arrived by
            if self.req_out[vertex] != NONE && self.req_out[vertex] != entry_edge {
                self.req_out[vertex]
            } else if self.req_in[vertex] != NONE && self.req_in[vertex] != entry_edge {
                self.req_in[vertex]
            } else {
                NONE
            }
        };
        Frame {
            vertex,
            mark,
            forced,
            tried_forced: false,
            cursor: NONE,
            started: false,
        }
    }

    fn next_candidate(&mut self) -> Option<usize> {
        let frame = self.frames.last_mut().expect("active frame");
        if frame.forced != NONE {
            if frame.tried_forced {
                return None;
            }
            frame.tried_forced = true;
            return Some(frame.forced);
        }
        let arc = if !frame.started {
            frame.started = true;
            self.head_out[frame.vertex]
        } else if frame.cursor == NONE {
            NONE
        } else {
            self.next[frame.cursor]
        };
        frame.cursor = arc;
        if arc == NONE {
            None
        } else {
            Some(arc >> 1)
        }
    }

    fn next_cycle(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        loop {
            let depth = self.path.len();
            let head = self.frames.last().expect("active frame").vertex;
            match self.next_candidate() {
                Some(e) => {
                    let w = other_endpoint(self.endpoints[e], head);
                    // undirected arc lists also look back along the entry
                    // edge
                    if depth > 0 && e == self.path[depth - 1] {
                        continue;
                    }
                    if w == self.origin {
                        if depth != self.n - 1 {
                            continue;
                        }
                        if !self.directed {
                            if e == self.path[0] {
                                continue;
                            }
                            // emit each undirected cycle in one orientation
                            let free_origin = self.frames[0].forced == NONE;
                            if free_origin && e < self.path[0] {
                                continue;
                            }
                        }
                        let mut cycle = self.path.clone();
                        cycle.push(e);
                        trace!("hamiltonian cycle found");
                        return Some(cycle);
                    }
                    if self.visited.contains(w) || depth == self.n - 1 {
                        continue;
                    }
                    let mark = self.history.len();
                    self.visited.insert(w);
                    if self.require_edge(e) && self.process() && self.reachable_ok(w) {
                        self.path.push(e);
                        let frame = self.enter_frame(w, e, mark);
                        self.frames.push(frame);
                    } else {
                        self.rewind_to(mark);
                        self.visited.set(w, false);
                    }
                }
                None => {
                    let frame = self.frames.pop().expect("active frame");
                    if self.frames.is_empty() {
                        self.done = true;
                        return None;
                    }
                    self.rewind_to(frame.mark);
                    self.visited.set(frame.vertex, false);
                    self.path.pop();
                }
            }
        }
    }
}
