//! Degree centrality.
//!
//! The fraction of the other `n - 1` nodes a node is adjacent to. Directed
//! graphs use in + out degree, so values can exceed 1.0 when a node has
//! both an in-edge and an out-edge to the same neighbor.

use crate::graph::normalize::SimpleGraph;

/// Degree centrality per node in index order.
///
/// Graphs with fewer than two nodes have no "other" nodes to be connected
/// to; every node scores 0.0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn degree_centrality(g: &SimpleGraph) -> Vec<f64> {
    let n = g.node_count();
    if n < 2 {
        return vec![0.0; n];
    }

    let scale = 1.0 / (n - 1) as f64;
    g.degrees().into_iter().map(|d| d as f64 * scale).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build::RawGraph;

    fn graph(edges: &[(&str, &str)], directed: bool) -> SimpleGraph {
        SimpleGraph::from_raw(RawGraph::from_edges(edges, directed)).0
    }

    #[test]
    fn empty_graph_returns_empty() {
        assert!(degree_centrality(&graph(&[], false)).is_empty());
    }

    #[test]
    fn single_node_scores_zero() {
        assert_eq!(degree_centrality(&graph(&[("A", "A")], false)), vec![0.0]);
    }

    #[test]
    fn path_of_three() {
        let dc = degree_centrality(&graph(&[("A", "B"), ("B", "C")], false));
        assert_eq!(dc, vec![0.5, 1.0, 0.5]);
    }

    #[test]
    fn star_center_is_one() {
        let dc = degree_centrality(&graph(&[("hub", "a"), ("hub", "b"), ("hub", "c")], false));
        assert!((dc[0] - 1.0).abs() < 1e-12);
        for leaf in &dc[1..] {
            assert!((leaf - 1.0 / 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn directed_mutual_pair_exceeds_one() {
        let dc = degree_centrality(&graph(&[("A", "B"), ("B", "A")], true));
        assert_eq!(dc, vec![2.0, 2.0]);
    }
}
