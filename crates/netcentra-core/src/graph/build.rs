//! Graph construction from whitespace-separated edge-list files.
//!
//! # Format
//!
//! ```text
//! # comment lines and trailing comments are ignored
//! node_a node_b
//! node_b node_c 0.75
//! ```
//!
//! Each non-blank line holds two node identifiers and an optional `f64`
//! weight. Identifiers are opaque strings; nodes are numbered in order of
//! first appearance and that order is preserved through every later stage.
//!
//! ## Storage
//!
//! Edges are stored in a petgraph [`DiGraph`] in the order `first → second`
//! regardless of directedness. For undirected runs the direction is ignored
//! by every consumer (neighbors are walked with `neighbors_undirected`).
//!
//! [`RawGraph`] keeps every parsed line as its own edge, so self-loops and
//! parallel edges are still present. [`crate::graph::normalize`] removes
//! them.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, instrument};

use crate::error::LoadError;

/// Start of a comment in an edge-list line.
const COMMENT: char = '#';

// ---------------------------------------------------------------------------
// RawGraph
// ---------------------------------------------------------------------------

/// An edge-list graph exactly as read from disk.
///
/// Nodes are string identifiers, edge weights are `f64` (1.0 when the line
/// had no weight).
#[derive(Debug, Clone)]
pub struct RawGraph {
    /// Node weights are identifiers; edges keep file order.
    pub graph: DiGraph<String, f64>,
    /// Mapping from node identifier to petgraph `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
    /// Whether edges are ordered pairs.
    pub directed: bool,
}

impl RawGraph {
    /// An empty graph.
    #[must_use]
    pub fn new(directed: bool) -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
            directed,
        }
    }

    /// Read an edge-list file.
    ///
    /// # Errors
    ///
    /// - [`LoadError::NotFound`] if `path` does not exist.
    /// - [`LoadError::Read`] if it cannot be opened or is not UTF-8.
    /// - [`LoadError::Malformed`] for the first line that is not
    ///   `node node [weight]`.
    #[instrument]
    pub fn from_edge_list(path: &Path, directed: bool) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                LoadError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                LoadError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let raw = Self::from_reader(BufReader::new(file), path, directed)?;
        debug!(
            nodes = raw.node_count(),
            edges = raw.edge_count(),
            "edge list loaded"
        );
        Ok(raw)
    }

    /// Parse edge-list lines from any buffered reader.
    ///
    /// `path` is only used to label errors.
    ///
    /// # Errors
    ///
    /// Same as [`RawGraph::from_edge_list`], minus `NotFound`.
    pub fn from_reader(
        reader: impl BufRead,
        path: &Path,
        directed: bool,
    ) -> Result<Self, LoadError> {
        let mut raw = Self::new(directed);

        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| LoadError::Read {
                path: path.to_path_buf(),
                source,
            })?;

            match parse_line(&line) {
                Ok(Some(edge)) => {
                    raw.add_edge(edge.source, edge.target, edge.weight);
                }
                Ok(None) => {}
                Err(reason) => {
                    return Err(LoadError::Malformed {
                        path: path.to_path_buf(),
                        line: idx + 1,
                        content: line,
                        reason,
                    });
                }
            }
        }

        Ok(raw)
    }

    /// Build a graph from unweighted `(source, target)` pairs.
    #[must_use]
    pub fn from_edges(edges: &[(&str, &str)], directed: bool) -> Self {
        let mut raw = Self::new(directed);
        for (a, b) in edges {
            raw.add_edge(a, b, 1.0);
        }
        raw
    }

    /// Insert `id` if unseen and return its index.
    pub fn add_node(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(id.to_string());
        self.node_map.insert(id.to_string(), idx);
        idx
    }

    /// Append an edge, creating endpoints as needed. Duplicates are kept.
    pub fn add_edge(&mut self, source: &str, target: &str, weight: f64) {
        let a = self.add_node(source);
        let b = self.add_node(target);
        self.graph.add_edge(a, b, weight);
    }

    /// Return the number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of edges, including loops and duplicates.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up the `NodeIndex` for a node identifier.
    #[must_use]
    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }
}

// ---------------------------------------------------------------------------
// Line parsing
// ---------------------------------------------------------------------------

/// One parsed edge-list line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeLine<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub weight: f64,
}

/// Parse a single line.
///
/// Returns `Ok(None)` for blank and comment-only lines.
///
/// # Errors
///
/// Returns a human-readable reason when the line has the wrong number of
/// fields or a weight that is not a finite number.
pub fn parse_line(line: &str) -> Result<Option<EdgeLine<'_>>, String> {
    let content = line.split_once(COMMENT).map_or(line, |(before, _)| before);
    let fields: Vec<&str> = content.split_whitespace().collect();

    match *fields.as_slice() {
        [] => Ok(None),
        [source, target] => Ok(Some(EdgeLine {
            source,
            target,
            weight: 1.0,
        })),
        [source, target, weight] => {
            let weight = weight
                .parse::<f64>()
                .map_err(|_| format!("weight {weight:?} is not a number"))?;
            if !weight.is_finite() {
                return Err("weight is not finite".to_string());
            }
            Ok(Some(EdgeLine {
                source,
                target,
                weight,
            }))
        }
        ref other => Err(format!("expected 2 or 3 fields, found {}", other.len())),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn parse(text: &str, directed: bool) -> Result<RawGraph, LoadError> {
        RawGraph::from_reader(Cursor::new(text), Path::new("test.edges"), directed)
    }

    #[test]
    fn parse_line_two_fields() {
        let edge = parse_line("A B").expect("ok").expect("edge");
        assert_eq!(edge.source, "A");
        assert_eq!(edge.target, "B");
        assert!((edge.weight - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_line_weighted_with_tabs() {
        let edge = parse_line("  n1\tn2\t0.25  ").expect("ok").expect("edge");
        assert_eq!((edge.source, edge.target), ("n1", "n2"));
        assert!((edge.weight - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_line_skips_blank_and_comments() {
        assert_eq!(parse_line(""), Ok(None));
        assert_eq!(parse_line("   "), Ok(None));
        assert_eq!(parse_line("# header"), Ok(None));
    }

    #[test]
    fn parse_line_strips_trailing_comment() {
        let edge = parse_line("A B # strong tie").expect("ok").expect("edge");
        assert_eq!((edge.source, edge.target), ("A", "B"));
    }

    #[test]
    fn parse_line_rejects_wrong_arity() {
        assert!(parse_line("A").is_err());
        assert!(parse_line("A B 1.0 extra").is_err());
    }

    #[test]
    fn parse_line_rejects_bad_weight() {
        let err = parse_line("A B heavy").expect_err("bad weight");
        assert!(err.contains("heavy"));
    }

    #[test]
    fn parse_line_rejects_non_finite_weight() {
        for line in ["A B inf", "A B -inf", "A B NaN", "A B infinity"] {
            let err = parse_line(line).expect_err(line);
            assert_eq!(err, "weight is not finite");
        }
    }

    #[test]
    fn infinite_weight_is_malformed_line() {
        let err = parse("A B inf\nA C 1\n", false).expect_err("inf weight");
        match err {
            LoadError::Malformed { line, reason, .. } => {
                assert_eq!(line, 1);
                assert_eq!(reason, "weight is not finite");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_input_is_empty_graph() {
        let raw = parse("", false).expect("parse");
        assert_eq!(raw.node_count(), 0);
        assert_eq!(raw.edge_count(), 0);
    }

    #[test]
    fn keeps_loops_and_duplicates() {
        let raw = parse("A B\nB C\nA A\nA B\n", false).expect("parse");
        assert_eq!(raw.node_count(), 3);
        assert_eq!(raw.edge_count(), 4);
    }

    #[test]
    fn nodes_in_first_appearance_order() {
        let raw = parse("z y\nx z\n", false).expect("parse");
        let order: Vec<&str> = raw
            .graph
            .node_indices()
            .map(|i| raw.graph[i].as_str())
            .collect();
        assert_eq!(order, vec!["z", "y", "x"]);
    }

    #[test]
    fn weights_are_stored() {
        let raw = parse("A B 2.5\n", true).expect("parse");
        let a = raw.node_index("A").expect("A");
        let b = raw.node_index("B").expect("B");
        let e = raw.graph.find_edge(a, b).expect("edge");
        assert!((raw.graph[e] - 2.5).abs() < f64::EPSILON);
        assert!(raw.directed);
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let err = parse("A B\n\nlonely\n", false).expect_err("malformed");
        match err {
            LoadError::Malformed {
                path,
                line,
                content,
                ..
            } => {
                assert_eq!(path, PathBuf::from("test.edges"));
                assert_eq!(line, 3);
                assert_eq!(content, "lonely");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = RawGraph::from_edge_list(&dir.path().join("absent.edges"), false)
            .expect_err("missing");
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("net.edges");
        std::fs::write(&path, "# tiny\nA B\nB C 3\n").expect("write");

        let raw = RawGraph::from_edge_list(&path, false).expect("load");
        assert_eq!(raw.node_count(), 3);
        assert_eq!(raw.edge_count(), 2);
    }
}
