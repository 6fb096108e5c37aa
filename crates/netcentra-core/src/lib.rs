#![forbid(unsafe_code)]
//! netcentra-core library.
//!
//! Loads an edge list, cleans it into a simple graph, and computes basic
//! statistics, degree/betweenness/PageRank centralities and their
//! correlations. Results are written as text, CSV and PNG histograms.
//!
//! # Conventions
//!
//! - **Errors**: Typed `thiserror` enums from [`error`]; every variant maps
//!   to a stable [`error::ErrorCode`].
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//! - **Progress**: User-facing progress goes through [`progress::ProgressObserver`],
//!   never stdout.

pub mod config;
pub mod correlation;
pub mod error;
pub mod graph;
pub mod histogram;
pub mod metrics;
pub mod pipeline;
pub mod progress;
pub mod report;
pub mod timing;

pub use config::AnalysisConfig;
pub use error::{AnalysisError, ErrorCode, LoadError};
pub use pipeline::{Pipeline, RunSummary, run};
