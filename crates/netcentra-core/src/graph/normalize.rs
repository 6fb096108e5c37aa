//! Self-loop removal and parallel-edge collapsing.
//!
//! # Overview
//!
//! The edge-list format allows the same pair to appear on several lines and
//! a node to link to itself. Every metric downstream assumes a simple graph,
//! so this module produces one:
//!
//! 1. **Self-loops** (`A A`) are dropped. Their endpoint stays in the graph,
//!    possibly as an isolated node.
//! 2. **Parallel edges** are collapsed to one edge per pair. For undirected
//!    graphs `A B` and `B A` are the same pair; for directed graphs they are
//!    distinct. When duplicates disagree on weight, the last one in file
//!    order wins.
//!
//! Node order and edge first-appearance order are preserved, so two runs on
//! the same file yield identical tables.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use petgraph::{
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};
use tracing::{debug, instrument};

use crate::graph::build::RawGraph;

// ---------------------------------------------------------------------------
// SimpleGraph
// ---------------------------------------------------------------------------

/// What [`SimpleGraph::from_raw`] removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub self_loops_removed: usize,
    pub parallel_edges_collapsed: usize,
}

impl CleanReport {
    /// Return `true` if cleaning changed nothing.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.self_loops_removed == 0 && self.parallel_edges_collapsed == 0
    }
}

/// A graph with no self-loops and at most one edge per node pair.
///
/// Node indices are dense `0..node_count()` in first-appearance order; all
/// metric vectors are indexed the same way.
#[derive(Debug, Clone)]
pub struct SimpleGraph {
    /// Node weights are identifiers; edge weights are `f64`.
    pub graph: DiGraph<String, f64>,
    /// Mapping from node identifier to `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
    /// Whether edges are ordered pairs.
    pub directed: bool,
}

impl SimpleGraph {
    /// Clean `raw` into a simple graph.
    #[must_use]
    #[instrument(skip(raw), fields(nodes = raw.node_count(), edges = raw.edge_count()))]
    pub fn from_raw(raw: RawGraph) -> (Self, CleanReport) {
        let directed = raw.directed;
        let mut report = CleanReport::default();

        // Same node set, same order.
        let mut graph = DiGraph::<String, f64>::with_capacity(raw.node_count(), raw.edge_count());
        for idx in raw.graph.node_indices() {
            graph.add_node(raw.graph[idx].clone());
        }

        // Pair key -> position in `kept`; later duplicates overwrite the weight.
        let mut seen: HashMap<(NodeIndex, NodeIndex), usize> = HashMap::new();
        let mut kept: Vec<(NodeIndex, NodeIndex, f64)> = Vec::new();

        for edge in raw.graph.edge_references() {
            let (a, b) = (edge.source(), edge.target());
            if a == b {
                report.self_loops_removed += 1;
                continue;
            }

            let key = pair_key(a, b, directed);
            if let Some(&pos) = seen.get(&key) {
                kept[pos].2 = *edge.weight();
                report.parallel_edges_collapsed += 1;
            } else {
                seen.insert(key, kept.len());
                kept.push((a, b, *edge.weight()));
            }
        }

        for (a, b, w) in kept {
            graph.add_edge(a, b, w);
        }

        debug!(
            self_loops = report.self_loops_removed,
            collapsed = report.parallel_edges_collapsed,
            "graph cleaned"
        );

        let simple = Self {
            graph,
            node_map: raw.node_map,
            directed,
        };
        (simple, report)
    }

    /// Hand the graph back as a [`RawGraph`] (e.g. to re-clean it).
    #[must_use]
    pub fn into_raw(self) -> RawGraph {
        RawGraph {
            graph: self.graph,
            node_map: self.node_map,
            directed: self.directed,
        }
    }

    /// Return the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Node identifiers in index order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph.node_indices().map(|idx| self.graph[idx].as_str())
    }

    /// Look up the `NodeIndex` for a node identifier.
    #[must_use]
    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    /// Return `true` if `a` and `b` are adjacent (respecting direction).
    #[must_use]
    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        match (self.node_index(a), self.node_index(b)) {
            (Some(ia), Some(ib)) if self.directed => self.graph.contains_edge(ia, ib),
            (Some(ia), Some(ib)) => self.graph.find_edge_undirected(ia, ib).is_some(),
            _ => false,
        }
    }

    /// Degree of `idx`: neighbor count, or in + out degree when directed.
    #[must_use]
    pub fn degree(&self, idx: NodeIndex) -> usize {
        // Every edge touches two distinct nodes, so the undirected neighbor
        // walk counts each incident edge once in either mode.
        self.graph.neighbors_undirected(idx).count()
    }

    /// Degree per node in index order.
    #[must_use]
    pub fn degrees(&self) -> Vec<usize> {
        self.graph
            .node_indices()
            .map(|idx| self.degree(idx))
            .collect()
    }

    /// Successors of `idx` along which walks may move.
    ///
    /// Outgoing neighbors for directed graphs, all neighbors otherwise.
    pub fn successors(&self, idx: NodeIndex) -> Box<dyn Iterator<Item = NodeIndex> + '_> {
        if self.directed {
            Box::new(self.graph.neighbors(idx))
        } else {
            Box::new(self.graph.neighbors_undirected(idx))
        }
    }

    /// Weighted walk steps out of `idx` as `(neighbor, weight)` pairs.
    ///
    /// Undirected edges are traversable from both ends.
    #[must_use]
    pub fn weighted_successors(&self, idx: NodeIndex) -> Vec<(NodeIndex, f64)> {
        let mut out: Vec<(NodeIndex, f64)> = self
            .graph
            .edges(idx)
            .map(|e| (e.target(), *e.weight()))
            .collect();

        if !self.directed {
            out.extend(
                self.graph
                    .edges_directed(idx, petgraph::Direction::Incoming)
                    .map(|e| (e.source(), *e.weight())),
            );
        }
        out
    }
}

fn pair_key(a: NodeIndex, b: NodeIndex, directed: bool) -> (NodeIndex, NodeIndex) {
    if directed || a < b { (a, b) } else { (b, a) }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(edges: &[(&str, &str)], directed: bool) -> (SimpleGraph, CleanReport) {
        SimpleGraph::from_raw(RawGraph::from_edges(edges, directed))
    }

    #[test]
    fn reference_example_undirected() {
        let (g, report) = clean(&[("A", "B"), ("B", "C"), ("A", "A"), ("A", "B")], false);

        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
        assert!(g.has_edge("A", "B"));
        assert!(g.has_edge("B", "C"));
        assert!(g.has_edge("C", "B"), "undirected lookup ignores order");
        assert!(!g.has_edge("A", "A"));
        assert_eq!(report.self_loops_removed, 1);
        assert_eq!(report.parallel_edges_collapsed, 1);
    }

    #[test]
    fn reversed_pair_is_duplicate_when_undirected() {
        let (g, report) = clean(&[("A", "B"), ("B", "A")], false);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(report.parallel_edges_collapsed, 1);
    }

    #[test]
    fn reversed_pair_is_distinct_when_directed() {
        let (g, report) = clean(&[("A", "B"), ("B", "A"), ("A", "B")], true);
        assert_eq!(g.edge_count(), 2);
        assert!(g.has_edge("A", "B"));
        assert!(g.has_edge("B", "A"));
        assert_eq!(report.parallel_edges_collapsed, 1);
    }

    #[test]
    fn loop_only_node_survives_isolated() {
        let (g, _) = clean(&[("A", "B"), ("C", "C")], false);
        assert_eq!(g.node_count(), 3);
        let c = g.node_index("C").expect("C");
        assert_eq!(g.degree(c), 0);
    }

    #[test]
    fn last_duplicate_weight_wins() {
        let mut raw = RawGraph::new(false);
        raw.add_edge("A", "B", 1.0);
        raw.add_edge("B", "A", 4.0);
        let (g, _) = SimpleGraph::from_raw(raw);

        let a = g.node_index("A").expect("A");
        let b = g.node_index("B").expect("B");
        let e = g.graph.find_edge_undirected(a, b).expect("edge").0;
        assert!((g.graph[e] - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn cleaning_is_idempotent() {
        let (once, first) = clean(&[("A", "B"), ("B", "A"), ("B", "B"), ("B", "C")], false);
        assert!(!first.is_noop());

        let before: Vec<String> = once.node_ids().map(str::to_string).collect();
        let edges_before = once.edge_count();

        let (twice, second) = SimpleGraph::from_raw(once.into_raw());
        assert!(second.is_noop());
        assert_eq!(twice.edge_count(), edges_before);
        assert_eq!(twice.node_ids().collect::<Vec<_>>(), before);
    }

    #[test]
    fn directed_degree_is_in_plus_out() {
        let (g, _) = clean(&[("A", "B"), ("C", "B"), ("B", "D")], true);
        let b = g.node_index("B").expect("B");
        assert_eq!(g.degree(b), 3);
    }

    #[test]
    fn successors_respect_direction() {
        let (g, _) = clean(&[("A", "B")], true);
        let a = g.node_index("A").expect("A");
        let b = g.node_index("B").expect("B");
        assert_eq!(g.successors(a).collect::<Vec<_>>(), vec![b]);
        assert_eq!(g.successors(b).count(), 0);

        let (u, _) = clean(&[("A", "B")], false);
        let ub = u.node_index("B").expect("B");
        assert_eq!(u.successors(ub).count(), 1);
        assert_eq!(u.weighted_successors(ub).len(), 1);
    }
}
