//! Basic structural statistics for a cleaned graph.
//!
//! # Statistics Provided
//!
//! - **num_nodes** / **num_edges**: size of the simple graph.
//! - **avg_degree**: `Σ degree / num_nodes`, or 0.0 for an empty graph.
//!   Directed degrees are in + out.
//! - **density**: `2E / (N(N-1))` undirected, `E / (N(N-1))` directed.
//!   Zero for graphs with 0 or 1 node.
//! - **num_connected_components**: number of connected components for
//!   undirected graphs. Not reported for directed graphs, where weak and
//!   strong connectivity differ.

use petgraph::algo::connected_components;
use serde::Serialize;

use crate::graph::normalize::SimpleGraph;

// ---------------------------------------------------------------------------
// BasicStats
// ---------------------------------------------------------------------------

/// Summary statistics, in the order they are written to `basic_stats.txt`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BasicStats {
    pub directed: bool,
    pub num_nodes: usize,
    pub num_edges: usize,
    pub avg_degree: f64,
    pub density: f64,
    /// `None` for directed graphs.
    pub num_connected_components: Option<usize>,
}

impl BasicStats {
    /// Compute statistics for `g`. Also returns the per-node degrees.
    #[must_use]
    pub fn from_graph(g: &SimpleGraph) -> (Self, Vec<usize>) {
        let degrees = g.degrees();
        let num_nodes = g.node_count();
        let num_edges = g.edge_count();

        let stats = Self {
            directed: g.directed,
            num_nodes,
            num_edges,
            avg_degree: average_degree(&degrees),
            density: compute_density(num_nodes, num_edges, g.directed),
            num_connected_components: (!g.directed).then(|| connected_components(&g.graph)),
        };
        (stats, degrees)
    }

    /// `(key, value)` pairs in field declaration order.
    ///
    /// Floats use Rust's shortest round-trip formatting; a missing component
    /// count is rendered as `n/a`.
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("directed", self.directed.to_string()),
            ("num_nodes", self.num_nodes.to_string()),
            ("num_edges", self.num_edges.to_string()),
            ("avg_degree", format!("{:?}", self.avg_degree)),
            ("density", format!("{:?}", self.density)),
            (
                "num_connected_components",
                self.num_connected_components
                    .map_or_else(|| "n/a".to_string(), |c| c.to_string()),
            ),
        ]
    }
}

// ---------------------------------------------------------------------------
// Internal helpers (cast precision suppressed at function scope)
// ---------------------------------------------------------------------------

#[allow(clippy::cast_precision_loss)]
fn average_degree(degrees: &[usize]) -> f64 {
    if degrees.is_empty() {
        return 0.0_f64;
    }
    degrees.iter().sum::<usize>() as f64 / degrees.len() as f64
}

#[allow(clippy::cast_precision_loss)]
fn compute_density(node_count: usize, edge_count: usize, directed: bool) -> f64 {
    if node_count < 2 {
        return 0.0_f64;
    }
    let max_edges = (node_count * (node_count - 1)) as f64;
    let edges = if directed {
        edge_count as f64
    } else {
        2.0 * edge_count as f64
    };
    edges / max_edges
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build::RawGraph;

    fn stats_for(edges: &[(&str, &str)], directed: bool) -> (BasicStats, Vec<usize>) {
        let (g, _) = SimpleGraph::from_raw(RawGraph::from_edges(edges, directed));
        BasicStats::from_graph(&g)
    }

    #[test]
    fn empty_graph_stats() {
        let (stats, degrees) = stats_for(&[], false);

        assert_eq!(stats.num_nodes, 0);
        assert_eq!(stats.num_edges, 0);
        assert!((stats.avg_degree - 0.0).abs() < f64::EPSILON);
        assert!((stats.density - 0.0).abs() < f64::EPSILON);
        assert_eq!(stats.num_connected_components, Some(0));
        assert!(degrees.is_empty());
    }

    #[test]
    fn reference_example() {
        let (stats, degrees) = stats_for(&[("A", "B"), ("B", "C"), ("A", "A"), ("A", "B")], false);

        assert_eq!(stats.num_nodes, 3);
        assert_eq!(stats.num_edges, 2);
        assert_eq!(degrees, vec![1, 2, 1]);
        assert!((stats.avg_degree - 4.0 / 3.0).abs() < 1e-12);
        assert!((stats.density - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(stats.num_connected_components, Some(1));
    }

    #[test]
    fn single_node_density_zero() {
        let (stats, _) = stats_for(&[("A", "A")], false);
        assert_eq!(stats.num_nodes, 1);
        assert!((stats.density - 0.0).abs() < f64::EPSILON);
        assert_eq!(stats.num_connected_components, Some(1));
    }

    #[test]
    fn directed_density_and_components() {
        // A → B, B → A: density = 2 / (2 * 1) = 1.0
        let (stats, degrees) = stats_for(&[("A", "B"), ("B", "A")], true);
        assert!((stats.density - 1.0).abs() < 1e-12);
        assert_eq!(stats.num_connected_components, None);
        assert_eq!(degrees, vec![2, 2]);
        assert!((stats.avg_degree - 2.0).abs() < 1e-12);
    }

    #[test]
    fn complete_undirected_density_is_one() {
        let (stats, _) = stats_for(&[("A", "B"), ("B", "C"), ("A", "C")], false);
        assert!((stats.density - 1.0).abs() < 1e-12);
    }

    #[test]
    fn disjoint_components_counted() {
        let (stats, _) = stats_for(&[("A", "B"), ("C", "D"), ("E", "E")], false);
        assert_eq!(stats.num_connected_components, Some(3));
    }

    #[test]
    fn entries_keep_declaration_order() {
        let (stats, _) = stats_for(&[("A", "B")], true);
        let keys: Vec<_> = stats.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                "directed",
                "num_nodes",
                "num_edges",
                "avg_degree",
                "density",
                "num_connected_components"
            ]
        );
        let values: Vec<_> = stats.entries().into_iter().map(|(_, v)| v).collect();
        assert_eq!(values, vec!["true", "2", "1", "1.0", "0.5", "n/a"]);
    }
}
