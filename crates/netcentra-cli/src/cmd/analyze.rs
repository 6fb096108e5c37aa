//! `netcentra analyze`: run the full pipeline and write every output.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use netcentra_core::config::resolve_config;
use netcentra_core::metrics::Measure;
use netcentra_core::pipeline::RunReport;
use netcentra_core::{AnalysisConfig, AnalysisError, Pipeline, RunSummary};
use serde::Serialize;
use tracing::debug;

use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_error, render_mode};

/// Rows shown in the terminal ranking; the files keep the full top N.
const PREVIEW_ROWS: usize = 5;

/// Arguments for `netcentra analyze` (also accepted without the subcommand).
#[derive(Args, Debug, Default, Clone)]
pub struct AnalyzeArgs {
    /// Edge-list file (`node node [weight]` per line).
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Treat edges as directed.
    #[arg(long, conflicts_with = "undirected")]
    pub directed: bool,

    /// Treat edges as undirected, overriding `directed = true` in the config.
    #[arg(long)]
    pub undirected: bool,

    /// Sample betweenness pivots instead of using every node as a source.
    #[arg(long, conflicts_with = "exact_betweenness")]
    pub approx_betweenness: bool,

    /// Use every node as a betweenness source, overriding the config.
    #[arg(long)]
    pub exact_betweenness: bool,

    /// Directory receiving all result files.
    #[arg(long, value_name = "DIR")]
    pub results_dir: Option<PathBuf>,

    /// Rows per top-nodes file.
    #[arg(long, value_name = "N")]
    pub top_n: Option<usize>,

    /// Histogram bins per distribution plot.
    #[arg(long, value_name = "N")]
    pub bins: Option<usize>,

    /// Pivot count for approximate betweenness.
    #[arg(long, value_name = "K")]
    pub samples: Option<usize>,

    /// Seed for approximate betweenness sampling.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Config file (default: ./netcentra.toml, then the user config dir).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl AnalyzeArgs {
    /// Resolve the config file and apply command-line overrides on top.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Config`] if the config file is unreadable or
    /// invalid.
    pub fn to_config(
        &self,
        cwd: &Path,
    ) -> Result<(AnalysisConfig, Option<PathBuf>), AnalysisError> {
        let (mut cfg, source) = resolve_config(self.config.as_deref(), cwd)?;

        if let Some(input) = &self.input {
            cfg.input.clone_from(input);
        }
        if let Some(dir) = &self.results_dir {
            cfg.results_dir.clone_from(dir);
        }
        if let Some(directed) = switch(self.directed, self.undirected) {
            cfg.directed = directed;
        }
        if let Some(exact) = switch(self.exact_betweenness, self.approx_betweenness) {
            cfg.exact_betweenness = exact;
        }
        if let Some(n) = self.top_n {
            cfg.top_n = n;
        }
        if let Some(bins) = self.bins {
            cfg.histogram_bins = bins;
        }
        if let Some(k) = self.samples {
            cfg.betweenness_samples = k;
        }
        if let Some(seed) = self.seed {
            cfg.seed = seed;
        }

        Ok((cfg, source))
    }
}

/// Resolve an `--on`/`--off` flag pair; `None` keeps the configured value.
pub const fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

#[derive(Debug, Serialize)]
struct TopEntry<'a> {
    node: &'a str,
    value: f64,
}

/// JSON payload for `netcentra analyze --json`.
#[derive(Debug, Serialize)]
struct AnalyzeOutput<'a> {
    config_file: Option<&'a Path>,
    results_dir: &'a Path,
    #[serde(flatten)]
    report: RunReport<'a>,
    top_pagerank: Vec<TopEntry<'a>>,
}

/// Execute `netcentra analyze`.
pub fn run_analyze(
    args: &AnalyzeArgs,
    output: OutputMode,
    quiet: bool,
    timing: bool,
    cwd: &Path,
) -> anyhow::Result<()> {
    let (cfg, source) = match args.to_config(cwd) {
        Ok(resolved) => resolved,
        Err(err) => return fail(output, &err),
    };
    debug!(config_file = ?source, "configuration resolved");
    let results_dir = cfg.results_dir.clone();

    let mut observer = super::observer(quiet);
    let summary = match Pipeline::new(cfg).run(observer.as_mut()) {
        Ok(summary) => summary,
        Err(err) => return fail(output, &err),
    };

    if timing {
        super::report_timings(&summary.timings)?;
    }

    let payload = AnalyzeOutput {
        config_file: source.as_deref(),
        results_dir: &results_dir,
        report: summary.report(),
        top_pagerank: top_entries(&summary, Measure::Pagerank),
    };

    render_mode(
        output,
        &payload,
        |p, w| render_text(p, &summary, w),
        |p, w| render_pretty(p, &summary, w),
    )
}

fn fail(output: OutputMode, err: &AnalysisError) -> anyhow::Result<()> {
    render_error(output, &CliError::from(err))?;
    anyhow::bail!("analysis failed ({})", err.code())
}

fn top_entries(summary: &RunSummary, measure: Measure) -> Vec<TopEntry<'_>> {
    summary
        .table
        .top_n(measure, PREVIEW_ROWS)
        .into_iter()
        .map(|(node, value)| TopEntry { node, value })
        .collect()
}

fn render_text(
    payload: &AnalyzeOutput<'_>,
    summary: &RunSummary,
    w: &mut dyn Write,
) -> io::Result<()> {
    for (key, value) in summary.stats.entries() {
        writeln!(w, "{key}={value}")?;
    }
    for entry in &payload.top_pagerank {
        writeln!(w, "top_pagerank={},{}", entry.node, entry.value)?;
    }
    for path in &summary.written {
        writeln!(w, "written={}", path.display())?;
    }
    Ok(())
}

fn render_pretty(
    payload: &AnalyzeOutput<'_>,
    summary: &RunSummary,
    w: &mut dyn Write,
) -> io::Result<()> {
    pretty_section(w, "Basic stats")?;
    for (key, value) in summary.stats.entries() {
        pretty_kv(w, key, value)?;
    }
    if !summary.clean.is_noop() {
        pretty_kv(w, "self_loops_removed", summary.clean.self_loops_removed.to_string())?;
        pretty_kv(
            w,
            "parallel_edges_collapsed",
            summary.clean.parallel_edges_collapsed.to_string(),
        )?;
    }

    writeln!(w)?;
    pretty_section(w, "Top nodes by PageRank")?;
    if payload.top_pagerank.is_empty() {
        writeln!(w, "(no nodes)")?;
    }
    for (rank, entry) in payload.top_pagerank.iter().enumerate() {
        writeln!(w, "{:>3}. {:<20} {:.6}", rank + 1, entry.node, entry.value)?;
    }

    writeln!(w)?;
    pretty_section(w, "Outputs")?;
    pretty_kv(w, "results_dir", payload.results_dir.display().to_string())?;
    pretty_kv(w, "files_written", summary.written.len().to_string())?;
    Ok(())
}
