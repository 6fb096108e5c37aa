//! Node centrality measures.
//!
//! # Overview
//!
//! Three measures are computed for every node of a [`SimpleGraph`], each
//! answering a different question about importance:
//!
//! - **Degree centrality** (`degree`): how many other nodes is this node
//!   directly connected to?
//! - **Betweenness centrality** (`betweenness`): how often does this node
//!   sit on shortest paths between others?
//! - **PageRank** (`pagerank`): how much of a damped random walk's time is
//!   spent here?
//!
//! # Engines
//!
//! Callers go through the [`CentralityEngine`] trait so alternative
//! implementations (or test doubles) can be swapped in. [`NetworkCentrality`]
//! is the default engine built on the functions in the submodules.
//!
//! ```rust,ignore
//! use netcentra_core::metrics::{compute_centralities, NetworkCentrality};
//!
//! let engine = NetworkCentrality::default();
//! let table = compute_centralities(&g, &engine, BetweennessMode::Exact, &mut SilentObserver);
//! for (node, value) in table.top_n(Measure::Pagerank, 5) {
//!     println!("{node}: {value:.4}");
//! }
//! ```

pub mod betweenness;
pub mod degree;
pub mod pagerank;

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;
use tracing::{instrument, warn};

use crate::graph::normalize::SimpleGraph;
use crate::progress::ProgressObserver;
use betweenness::BetweennessMode;
use pagerank::PageRankConfig;

// ---------------------------------------------------------------------------
// Measure
// ---------------------------------------------------------------------------

/// One column of the centrality table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    Degree,
    Betweenness,
    Pagerank,
}

impl Measure {
    /// All measures in column order.
    pub const ALL: [Self; 3] = [Self::Degree, Self::Betweenness, Self::Pagerank];

    /// Column name used in headers and file names.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Degree => "degree",
            Self::Betweenness => "betweenness",
            Self::Pagerank => "pagerank",
        }
    }

    /// Position in [`Measure::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Degree => 0,
            Self::Betweenness => 1,
            Self::Pagerank => 2,
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// CentralityEngine
// ---------------------------------------------------------------------------

/// Source of per-node centrality scores.
///
/// Every method returns one value per node in `g`'s index order.
pub trait CentralityEngine {
    fn degree(&self, g: &SimpleGraph) -> Vec<f64>;

    fn betweenness(&self, g: &SimpleGraph, mode: BetweennessMode) -> Vec<f64>;

    fn pagerank(&self, g: &SimpleGraph) -> Vec<f64>;
}

/// Default engine: Brandes betweenness and power-iteration PageRank.
#[derive(Debug, Clone, Default)]
pub struct NetworkCentrality {
    pub pagerank: PageRankConfig,
}

impl NetworkCentrality {
    #[must_use]
    pub const fn new(pagerank: PageRankConfig) -> Self {
        Self { pagerank }
    }
}

impl CentralityEngine for NetworkCentrality {
    fn degree(&self, g: &SimpleGraph) -> Vec<f64> {
        degree::degree_centrality(g)
    }

    fn betweenness(&self, g: &SimpleGraph, mode: BetweennessMode) -> Vec<f64> {
        betweenness::betweenness_centrality(g, mode)
    }

    fn pagerank(&self, g: &SimpleGraph) -> Vec<f64> {
        let result = pagerank::pagerank(g, &self.pagerank);
        if !result.converged {
            warn!(
                iterations = result.iterations,
                "PageRank did not converge; using last iterate"
            );
        }
        result.scores
    }
}

// ---------------------------------------------------------------------------
// CentralityTable
// ---------------------------------------------------------------------------

/// Per-node centrality scores, one row per node in graph order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CentralityTable {
    nodes: Vec<String>,
    columns: [Vec<f64>; 3],
}

/// One row of a [`CentralityTable`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CentralityRow<'a> {
    pub node: &'a str,
    pub degree: f64,
    pub betweenness: f64,
    pub pagerank: f64,
}

impl CentralityTable {
    /// Build a table from node ids and the three columns.
    ///
    /// Columns are aligned to `nodes`: missing trailing values become NaN and
    /// surplus values are dropped.
    #[must_use]
    pub fn new(
        nodes: Vec<String>,
        degree: Vec<f64>,
        betweenness: Vec<f64>,
        pagerank: Vec<f64>,
    ) -> Self {
        let n = nodes.len();
        let columns = [degree, betweenness, pagerank].map(|mut col| {
            col.resize(n, f64::NAN);
            col
        });
        Self { nodes, columns }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node identifiers in row order.
    #[must_use]
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// All values of one measure in row order.
    #[must_use]
    pub fn column(&self, measure: Measure) -> &[f64] {
        &self.columns[measure.index()]
    }

    /// Value of `measure` for `node`, if present.
    #[must_use]
    pub fn value(&self, node: &str, measure: Measure) -> Option<f64> {
        let row = self.nodes.iter().position(|n| n == node)?;
        Some(self.column(measure)[row])
    }

    /// Iterate over rows in order.
    pub fn rows(&self) -> impl Iterator<Item = CentralityRow<'_>> + '_ {
        self.nodes.iter().enumerate().map(|(i, node)| CentralityRow {
            node,
            degree: self.columns[0][i],
            betweenness: self.columns[1][i],
            pagerank: self.columns[2][i],
        })
    }

    /// The `n` highest-scoring rows for `measure`, descending.
    ///
    /// Ties keep row order (stable sort); NaN values sort last.
    #[must_use]
    pub fn top_n(&self, measure: Measure, n: usize) -> Vec<(&str, f64)> {
        let col = self.column(measure);
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&a, &b| descending_nan_last(col[a], col[b]));
        order
            .into_iter()
            .take(n)
            .map(|i| (self.nodes[i].as_str(), col[i]))
            .collect()
    }
}

fn descending_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Compute all three measures for `g` through `engine`.
///
/// An empty graph yields an empty table.
#[instrument(skip(g, engine, observer), fields(nodes = g.node_count()))]
pub fn compute_centralities(
    g: &SimpleGraph,
    engine: &dyn CentralityEngine,
    mode: BetweennessMode,
    observer: &mut dyn ProgressObserver,
) -> CentralityTable {
    observer.message("Computing degree centrality...");
    let degree = engine.degree(g);

    observer.message("Computing betweenness centrality...");
    let betweenness = engine.betweenness(g, mode);

    observer.message("Computing PageRank...");
    let pagerank = engine.pagerank(g);

    let nodes = g.node_ids().map(str::to_string).collect();
    CentralityTable::new(nodes, degree, betweenness, pagerank)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
