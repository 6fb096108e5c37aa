//! Weighted PageRank by power iteration.
//!
//! # Algorithm
//!
//! ```text
//! PR'(v) = (1 - d) / N + d * ( Σ PR(u) · w(u,v) / W(u)  +  D / N )   for each u → v
//! ```
//!
//! where `d` is the damping factor (default 0.85), `W(u)` the total weight
//! leaving `u`, and `D` the rank currently held by dangling nodes (nodes
//! with no outgoing weight), which is spread uniformly. Undirected edges are
//! walkable from both ends. Edges without an explicit weight weigh 1.0.
//!
//! Iteration starts from the uniform vector and stops when the L1 change
//! falls below `N · tolerance`, or after `max_iter` rounds. Ranks always sum
//! to 1 (up to floating-point error).

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::graph::normalize::SimpleGraph;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for PageRank computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageRankConfig {
    /// Damping factor (probability of following a link vs teleporting).
    /// Default: 0.85.
    pub damping: f64,
    /// Per-node convergence threshold; iteration stops when the L1 norm of
    /// the rank delta is below `N * tolerance`.
    /// Default: 1e-6.
    pub tolerance: f64,
    /// Maximum number of iterations.
    /// Default: 100.
    pub max_iter: usize,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            tolerance: 1e-6,
            max_iter: 100,
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Result of a PageRank computation.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRankResult {
    /// Scores per node in index order.
    pub scores: Vec<f64>,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the algorithm converged within `max_iter`.
    pub converged: bool,
}

// ---------------------------------------------------------------------------
// PageRank
// ---------------------------------------------------------------------------

/// Compute PageRank for every node of `g`.
///
/// An empty graph yields empty scores and counts as converged.
#[must_use]
#[instrument(skip(g, config), fields(nodes = g.node_count()))]
#[allow(clippy::cast_precision_loss)]
pub fn pagerank(g: &SimpleGraph, config: &PageRankConfig) -> PageRankResult {
    let n = g.node_count();

    if n == 0 {
        return PageRankResult {
            scores: Vec::new(),
            iterations: 0,
            converged: true,
        };
    }

    let n_f64 = n as f64;
    let d = config.damping;
    let teleport = (1.0 - d) / n_f64;

    // Row-normalized transition lists; empty for dangling nodes.
    let transitions: Vec<Vec<(usize, f64)>> = g
        .graph
        .node_indices()
        .map(|idx| {
            let steps: Vec<(usize, f64)> = g
                .weighted_successors(idx)
                .into_iter()
                .filter(|(_, w)| *w > 0.0)
                .map(|(t, w)| (t.index(), w))
                .collect();
            let total: f64 = steps.iter().map(|(_, w)| w).sum();
            if total > 0.0 {
                steps.into_iter().map(|(t, w)| (t, w / total)).collect()
            } else {
                Vec::new()
            }
        })
        .collect();

    let mut ranks = vec![1.0 / n_f64; n];
    let mut new_ranks = vec![0.0_f64; n];

    let mut iterations = 0;
    let mut converged = false;

    for _ in 0..config.max_iter {
        iterations += 1;

        let dangling_mass: f64 = transitions
            .iter()
            .zip(&ranks)
            .filter(|(steps, _)| steps.is_empty())
            .map(|(_, r)| r)
            .sum();
        let base = d.mul_add(dangling_mass / n_f64, teleport);

        for r in &mut new_ranks {
            *r = base;
        }

        for (u, steps) in transitions.iter().enumerate() {
            let share = d * ranks[u];
            for &(v, p) in steps {
                new_ranks[v] += share * p;
            }
        }

        // Check convergence: L1 norm of delta.
        let delta: f64 = ranks
            .iter()
            .zip(new_ranks.iter())
            .map(|(old, new)| (old - new).abs())
            .sum();

        std::mem::swap(&mut ranks, &mut new_ranks);

        if delta < n_f64 * config.tolerance {
            converged = true;
            break;
        }
    }

    PageRankResult {
        scores: ranks,
        iterations,
        converged,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
