//! End-to-end analysis run.
//!
//! ```text
//! load → clean → basic stats → centralities → correlation → plot → save
//! ```
//!
//! Each stage is announced to the [`ProgressObserver`] and timed into
//! [`StageTimings`]. The first failing stage aborts the run; files written by
//! earlier stages stay on disk.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, instrument};

use crate::config::{AnalysisConfig, EmptyGraphPolicy};
use crate::correlation::{
    CorrelationMatrix, PearsonEngine, StatisticsEngine, correlation_matrix,
};
use crate::error::AnalysisError;
use crate::graph::build::RawGraph;
use crate::graph::normalize::{CleanReport, SimpleGraph};
use crate::graph::stats::BasicStats;
use crate::metrics::{
    CentralityEngine, CentralityTable, NetworkCentrality, compute_centralities,
};
use crate::progress::{ProgressObserver, Stage};
use crate::report::{ResultWriter, plot_distributions};
use crate::timing::StageTimings;

/// Everything a completed run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub input: PathBuf,
    pub stats: BasicStats,
    pub clean: CleanReport,
    pub table: CentralityTable,
    pub correlation: CorrelationMatrix,
    pub timings: StageTimings,
    /// Files written, plots first.
    pub written: Vec<PathBuf>,
}

/// Machine-readable view of a [`RunSummary`] for `--json` output.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub input: &'a std::path::Path,
    pub stats: &'a BasicStats,
    pub self_loops_removed: usize,
    pub parallel_edges_collapsed: usize,
    pub correlation: &'a CorrelationMatrix,
    pub written: &'a [PathBuf],
}

impl RunSummary {
    #[must_use]
    pub fn report(&self) -> RunReport<'_> {
        RunReport {
            input: &self.input,
            stats: &self.stats,
            self_loops_removed: self.clean.self_loops_removed,
            parallel_edges_collapsed: self.clean.parallel_edges_collapsed,
            correlation: &self.correlation,
            written: &self.written,
        }
    }
}

/// A configured analysis run with swappable engines.
pub struct Pipeline {
    config: AnalysisConfig,
    centrality: Box<dyn CentralityEngine>,
    statistics: Box<dyn StatisticsEngine>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Pipeline using the built-in engines.
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        let centrality = Box::new(NetworkCentrality::new(config.pagerank.clone()));
        Self {
            config,
            centrality,
            statistics: Box::new(PearsonEngine),
        }
    }

    #[must_use]
    pub fn with_centrality_engine(mut self, engine: impl CentralityEngine + 'static) -> Self {
        self.centrality = Box::new(engine);
        self
    }

    #[must_use]
    pub fn with_statistics_engine(mut self, engine: impl StatisticsEngine + 'static) -> Self {
        self.statistics = Box::new(engine);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Load and clean the input, applying the empty-graph policy.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Load`] if the edge list cannot be read, or
    /// [`AnalysisError::EmptyGraph`] under [`EmptyGraphPolicy::Reject`].
    pub fn prepare(
        &self,
        observer: &mut dyn ProgressObserver,
        timings: &mut StageTimings,
    ) -> Result<(SimpleGraph, CleanReport), AnalysisError> {
        let cfg = &self.config;

        observer.stage_started(Stage::Load);
        let raw = timings.time(Stage::Load, || {
            RawGraph::from_edge_list(&cfg.input, cfg.directed)
        })?;

        observer.stage_started(Stage::Clean);
        let (g, clean) = timings.time(Stage::Clean, || SimpleGraph::from_raw(raw));
        if !clean.is_noop() {
            info!(
                self_loops = clean.self_loops_removed,
                parallel_edges = clean.parallel_edges_collapsed,
                "graph cleaned"
            );
        }

        if g.node_count() == 0 && cfg.empty_graph == EmptyGraphPolicy::Reject {
            return Err(AnalysisError::EmptyGraph {
                path: cfg.input.clone(),
            });
        }

        Ok((g, clean))
    }

    /// Load, clean and summarize without computing centralities or writing
    /// anything.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::prepare`].
    pub fn basic_stats(
        &self,
        observer: &mut dyn ProgressObserver,
    ) -> Result<(BasicStats, CleanReport), AnalysisError> {
        let mut timings = StageTimings::default();
        let (g, clean) = self.prepare(observer, &mut timings)?;
        observer.stage_started(Stage::BasicStats);
        let (stats, _) = BasicStats::from_graph(&g);
        Ok((stats, clean))
    }

    /// Run every stage and write all outputs under `results_dir`.
    ///
    /// # Errors
    ///
    /// Returns the first stage failure: load, empty graph (when rejected),
    /// plot rendering or file output.
    #[instrument(skip_all, fields(input = %self.config.input.display()))]
    pub fn run(&self, observer: &mut dyn ProgressObserver) -> Result<RunSummary, AnalysisError> {
        let cfg = &self.config;
        let mut timings = StageTimings::default();

        let (g, clean) = self.prepare(observer, &mut timings)?;

        observer.stage_started(Stage::BasicStats);
        let (stats, _degrees) = timings.time(Stage::BasicStats, || BasicStats::from_graph(&g));
        observer.message(&format!("Basic stats: {}", stats_line(&stats)));

        observer.stage_started(Stage::Centralities);
        let mode = cfg.betweenness_mode();
        let table = timings.time(Stage::Centralities, || {
            compute_centralities(&g, self.centrality.as_ref(), mode, &mut *observer)
        });

        observer.stage_started(Stage::Correlation);
        let correlation = timings.time(Stage::Correlation, || {
            correlation_matrix(&table, self.statistics.as_ref())
        });

        observer.stage_started(Stage::Plot);
        let mut written = timings.time(Stage::Plot, || {
            plot_distributions(&table, &cfg.plots_dir(), cfg.histogram_bins)
        })?;

        observer.stage_started(Stage::Save);
        let writer = ResultWriter::from_config(cfg);
        written.extend(timings.time(Stage::Save, || {
            writer.write_all(&stats, &table, &correlation)
        })?);
        observer.message(&format!(
            "Saved results to '{}/'.",
            cfg.results_dir.display()
        ));
        observer.message("Done.");

        Ok(RunSummary {
            input: cfg.input.clone(),
            stats,
            clean,
            table,
            correlation,
            timings,
            written,
        })
    }
}

/// One-line rendering of the basic statistics for progress output.
fn stats_line(stats: &BasicStats) -> String {
    stats
        .entries()
        .into_iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run the full pipeline with the built-in engines.
///
/// # Errors
///
/// See [`Pipeline::run`].
pub fn run(
    config: AnalysisConfig,
    observer: &mut dyn ProgressObserver,
) -> Result<RunSummary, AnalysisError> {
    Pipeline::new(config).run(observer)
}
