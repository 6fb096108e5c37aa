//! Graph loading, cleaning and summary statistics.
//!
//! # Pipeline
//!
//! ```text
//! edge-list file
//!        ↓  build::RawGraph::from_edge_list()
//! RawGraph (may contain self-loops and parallel edges)
//!        ↓  normalize::SimpleGraph::from_raw()
//! SimpleGraph + CleanReport
//!        ↓  stats::BasicStats::from_graph()
//! BasicStats (counts, average degree, density, components)
//! ```
//!
//! ## Typical Usage
//!
//! ```rust,ignore
//! use netcentra_core::graph::{RawGraph, SimpleGraph, BasicStats};
//!
//! let raw = RawGraph::from_edge_list(Path::new("data/net.edges"), false)?;
//! let (g, _report) = SimpleGraph::from_raw(raw);
//! let (stats, _degrees) = BasicStats::from_graph(&g);
//!
//! println!("nodes={} edges={} density={:.3}",
//!     stats.num_nodes, stats.num_edges, stats.density);
//! ```

pub mod build;
pub mod normalize;
pub mod stats;

// Re-export primary types at module level for convenience.
pub use build::{EdgeLine, RawGraph, parse_line};
pub use normalize::{CleanReport, SimpleGraph};
pub use stats::BasicStats;
