//! Betweenness centrality via Brandes' algorithm.
//!
//! # Overview
//!
//! Betweenness centrality measures how often a node lies on shortest paths
//! between other pairs of nodes. High-betweenness nodes are bridges: removing
//! them lengthens or breaks many shortest paths.
//!
//! # Algorithm
//!
//! Brandes (2001) for unweighted graphs:
//!
//! 1. For each source node `s`, run BFS to compute shortest-path counts
//!    and distances.
//! 2. Accumulate dependency scores in reverse BFS order (farthest first).
//! 3. Sum the dependency scores across all sources.
//!
//! Undirected graphs are walked in both directions, so every unordered pair
//! is visited once from each end.
//!
//! # Normalization
//!
//! Raw sums are multiplied by `1 / ((n - 1)(n - 2))` when `n > 2`. For
//! undirected graphs this equals dividing the unordered-pair count by the
//! number of unordered pairs not involving the node. Graphs with `n <= 2`
//! are left unscaled (every score is 0 there anyway).
//!
//! # Sampling
//!
//! [`BetweennessMode::Sampled`] runs the BFS from `k` pivot sources chosen
//! with a seeded [`StdRng`] and rescales by `n / k`, so repeated runs on the
//! same graph give identical scores. When `k >= n` the exact computation is
//! used instead.

use std::collections::VecDeque;

use petgraph::graph::NodeIndex;
use rand::{SeedableRng, rngs::StdRng, seq::index};
use tracing::{debug, instrument};

use crate::graph::normalize::SimpleGraph;

/// How many BFS sources to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BetweennessMode {
    /// Every node is a source.
    Exact,
    /// `k` pivot sources drawn with a fixed `seed`.
    Sampled { k: usize, seed: u64 },
}

/// Normalized betweenness centrality per node in index order.
///
/// Disconnected nodes and nodes on no shortest path score 0.0. An empty
/// graph returns an empty vector.
#[must_use]
#[instrument(skip(g), fields(nodes = g.node_count()))]
#[allow(clippy::cast_precision_loss)]
pub fn betweenness_centrality(g: &SimpleGraph, mode: BetweennessMode) -> Vec<f64> {
    let n = g.node_count();
    if n == 0 {
        return Vec::new();
    }

    let (sources, sampled) = pivots(n, mode);
    debug!(sources = sources.len(), sampled, "betweenness sources selected");

    let mut cb: Vec<f64> = vec![0.0; n];
    for s in sources.iter().copied() {
        accumulate_from(g, NodeIndex::new(s), &mut cb);
    }

    if n > 2 {
        let mut scale = 1.0 / ((n - 1) * (n - 2)) as f64;
        if sampled {
            scale *= n as f64 / sources.len() as f64;
        }
        for v in &mut cb {
            *v *= scale;
        }
    }

    cb
}

/// Source node positions and whether they are a strict sample.
fn pivots(n: usize, mode: BetweennessMode) -> (Vec<usize>, bool) {
    match mode {
        BetweennessMode::Sampled { k, seed } if k.max(1) < n => {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut picked = index::sample(&mut rng, n, k.max(1)).into_vec();
            picked.sort_unstable();
            (picked, true)
        }
        _ => ((0..n).collect(), false),
    }
}

/// One Brandes BFS + dependency accumulation from source `s`.
fn accumulate_from(g: &SimpleGraph, s: NodeIndex, cb: &mut [f64]) {
    let n = cb.len();
    let si = s.index();

    // Stack: nodes in order of discovery (farthest popped first).
    let mut stack: Vec<NodeIndex> = Vec::with_capacity(n);

    // predecessors[w]: nodes immediately preceding w on shortest paths from s.
    let mut predecessors: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];

    // sigma[t]: number of shortest paths from s to t.
    let mut sigma: Vec<f64> = vec![0.0; n];
    sigma[si] = 1.0;

    // dist[t]: distance from s to t (-1 = unvisited).
    let mut dist: Vec<i64> = vec![-1; n];
    dist[si] = 0;

    let mut queue: VecDeque<NodeIndex> = VecDeque::new();
    queue.push_back(s);

    while let Some(v) = queue.pop_front() {
        let vi = v.index();
        stack.push(v);

        for w in g.successors(v) {
            let wi = w.index();

            if dist[wi] < 0 {
                dist[wi] = dist[vi] + 1;
                queue.push_back(w);
            }

            if dist[wi] == dist[vi] + 1 {
                sigma[wi] += sigma[vi];
                predecessors[wi].push(v);
            }
        }
    }

    // Accumulate dependencies in reverse BFS order.
    let mut delta: Vec<f64> = vec![0.0; n];

    while let Some(w) = stack.pop() {
        let wi = w.index();

        for &v in &predecessors[wi] {
            let vi = v.index();
            if sigma[wi] > 0.0 {
                delta[vi] += (sigma[vi] / sigma[wi]) * (1.0 + delta[wi]);
            }
        }

        if wi != si {
            cb[wi] += delta[wi];
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
