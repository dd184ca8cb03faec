//! Best-first (A*) search over an implicit graph
//!
//! The graph is never materialized: the caller supplies a neighbor oracle
//! yielding `(node, edge)` pairs, an edge cost and an admissible heuristic.
//! The open set is a [`PriorityQueue`] keyed by `f = g + h`; when a cheaper
//! `g` is found for a node that is still queued, its entry is updated in
//! place with `update_key` rather than inserted a second time.
//!
//! Among entries with equal `f` the expansion order is whatever the heap's
//! left bias and the insertion order produce. Costs are continuous in
//! practice, so this tie-break carries no guarantee.

use crate::queue::PriorityQueue;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use tracing::{debug, trace, warn};

/// Bounds on a single search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Give up (unreachable) after this many node expansions
    pub max_expansions: Option<usize>,
}

impl SearchLimits {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn expansions(limit: usize) -> Self {
        Self {
            max_expansions: Some(limit),
        }
    }
}

/// Result of a search: visited nodes in order, the edges between them and
/// the accumulated cost
#[derive(Debug, Clone, PartialEq)]
pub struct Path<N, E> {
    pub nodes: Vec<N>,
    pub edges: Vec<E>,
    pub cost: f64,
}

impl<N, E> Path<N, E> {
    /// The canonical "no connection" value: just the start, infinite cost
    pub fn unreachable(start: N) -> Self {
        Self {
            nodes: vec![start],
            edges: Vec::new(),
            cost: f64::INFINITY,
        }
    }

    /// Zero-length path for start == goal
    pub fn trivial(start: N) -> Self {
        Self {
            nodes: vec![start],
            edges: Vec::new(),
            cost: 0.0,
        }
    }

    pub fn exists(&self) -> bool {
        self.nodes.len() > 1
    }
}

struct OpenEntry<N> {
    node: N,
    g: f64,
    f: f64,
}

struct Visit<N, E> {
    g: f64,
    parent: Option<(N, E)>,
}

/// A* from `start` to `goal`.
///
/// `heuristic(n, goal)` must never overestimate the remaining cost and edge
/// costs must be non-negative; edges with a NaN or negative cost are
/// skipped.
pub fn solve<N, E, FN, I, FC, FH>(
    start: N,
    goal: N,
    mut neighbors: FN,
    mut cost: FC,
    mut heuristic: FH,
    limits: SearchLimits,
) -> Path<N, E>
where
    N: Copy + Eq + Hash + Debug,
    FN: FnMut(N) -> I,
    I: IntoIterator<Item = (N, E)>,
    FC: FnMut(N, N, &E) -> f64,
    FH: FnMut(N, N) -> f64,
{
    if start == goal {
        return Path::trivial(start);
    }

    let mut open = PriorityQueue::with_comparer(|a: &OpenEntry<N>, b: &OpenEntry<N>| a.f.total_cmp(&b.f));
    let mut visits: HashMap<N, Visit<N, E>> = HashMap::new();
    let mut closed: HashSet<N> = HashSet::new();
    let mut expansions = 0usize;

    visits.insert(start, Visit { g: 0.0, parent: None });
    open.enqueue(OpenEntry {
        node: start,
        g: 0.0,
        f: heuristic(start, goal),
    });

    while let Ok(current) = open.dequeue() {
        if current.node == goal {
            let path = reconstruct(visits, goal, current.g);
            debug!(
                ?start,
                ?goal,
                expansions,
                hops = path.edges.len(),
                cost = path.cost,
                "path found"
            );
            return path;
        }

        if !closed.insert(current.node) {
            continue;
        }

        expansions += 1;
        if let Some(limit) = limits.max_expansions {
            if expansions > limit {
                warn!(?start, ?goal, limit, "search expansion cap reached");
                return Path::unreachable(start);
            }
        }
        trace!(node = ?current.node, g = current.g, f = current.f, "expanding");

        for (next, edge) in neighbors(current.node) {
            if closed.contains(&next) {
                continue;
            }
            let step = cost(current.node, next, &edge);
            if !(step >= 0.0) {
                continue;
            }

            let tentative = current.g + step;
            if visits.get(&next).is_some_and(|v| tentative >= v.g) {
                continue;
            }

            let f = tentative + heuristic(next, goal);
            visits.insert(
                next,
                Visit {
                    g: tentative,
                    parent: Some((current.node, edge)),
                },
            );

            match open.position(|e| e.node == next) {
                Some(index) => {
                    if let Err(err) = open.update_key(index, |e| {
                        e.g = tentative;
                        e.f = f;
                    }) {
                        trace!(%err, "open set entry vanished");
                    }
                }
                None => open.enqueue(OpenEntry {
                    node: next,
                    g: tentative,
                    f,
                }),
            }
        }
    }

    debug!(?start, ?goal, expansions, "no path");
    Path::unreachable(start)
}

/// Uniform-cost search (A* with a zero heuristic)
pub fn shortest_path<N, E, FN, I, FC>(start: N, goal: N, neighbors: FN, cost: FC) -> Path<N, E>
where
    N: Copy + Eq + Hash + Debug,
    FN: FnMut(N) -> I,
    I: IntoIterator<Item = (N, E)>,
    FC: FnMut(N, N, &E) -> f64,
{
    solve(start, goal, neighbors, cost, |_, _| 0.0, SearchLimits::unbounded())
}

fn reconstruct<N, E>(mut visits: HashMap<N, Visit<N, E>>, goal: N, cost: f64) -> Path<N, E>
where
    N: Copy + Eq + Hash,
{
    let mut nodes = vec![goal];
    let mut edges = Vec::new();
    let mut cursor = goal;

    while let Some((parent, edge)) = visits.remove(&cursor).and_then(|v| v.parent) {
        edges.push(edge);
        nodes.push(parent);
        cursor = parent;
    }

    nodes.reverse();
    edges.reverse();
    Path { nodes, edges, cost }
}
