//! `netcentra stats`: load and clean a graph, print its basic statistics.
//!
//! Nothing is written to disk.

use std::path::{Path, PathBuf};

use clap::Args;
use netcentra_core::config::resolve_config;
use netcentra_core::graph::stats::BasicStats;
use netcentra_core::{AnalysisConfig, AnalysisError, Pipeline};
use serde::Serialize;

use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_error, render_mode};

/// Arguments for `netcentra stats`.
#[derive(Args, Debug, Default)]
pub struct StatsArgs {
    /// Edge-list file (`node node [weight]` per line).
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Treat edges as directed.
    #[arg(long, conflicts_with = "undirected")]
    pub directed: bool,

    /// Treat edges as undirected, overriding `directed = true` in the config.
    #[arg(long)]
    pub undirected: bool,

    /// Config file (default: ./netcentra.toml, then the user config dir).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl StatsArgs {
    fn to_config(&self, cwd: &Path) -> Result<AnalysisConfig, AnalysisError> {
        let (mut cfg, _) = resolve_config(self.config.as_deref(), cwd)?;
        if let Some(input) = &self.input {
            cfg.input.clone_from(input);
        }
        if let Some(directed) = super::analyze::switch(self.directed, self.undirected) {
            cfg.directed = directed;
        }
        Ok(cfg)
    }
}

/// Report payload for `netcentra stats`.
#[derive(Debug, Serialize)]
pub struct GraphStats {
    pub input: PathBuf,
    #[serde(flatten)]
    pub stats: BasicStats,
    pub self_loops_removed: usize,
    pub parallel_edges_collapsed: usize,
}

/// Execute `netcentra stats`.
pub fn run_stats(
    args: &StatsArgs,
    output: OutputMode,
    quiet: bool,
    cwd: &Path,
) -> anyhow::Result<()> {
    let result = args.to_config(cwd).and_then(|cfg| {
        let input = cfg.input.clone();
        let mut observer = super::observer(quiet);
        Pipeline::new(cfg)
            .basic_stats(observer.as_mut())
            .map(|(stats, clean)| GraphStats {
                input,
                stats,
                self_loops_removed: clean.self_loops_removed,
                parallel_edges_collapsed: clean.parallel_edges_collapsed,
            })
    });

    let payload = match result {
        Ok(payload) => payload,
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            anyhow::bail!("stats failed ({})", err.code());
        }
    };

    render_mode(
        output,
        &payload,
        |p, w| {
            for (key, value) in p.stats.entries() {
                writeln!(w, "{key}={value}")?;
            }
            writeln!(w, "self_loops_removed={}", p.self_loops_removed)?;
            writeln!(w, "parallel_edges_collapsed={}", p.parallel_edges_collapsed)
        },
        |p, w| {
            pretty_section(w, &format!("Graph {}", p.input.display()))?;
            for (key, value) in p.stats.entries() {
                pretty_kv(w, key, value)?;
            }
            pretty_kv(w, "self_loops_removed", p.self_loops_removed.to_string())?;
            pretty_kv(w, "parallel_edges_collapsed", p.parallel_edges_collapsed.to_string())
        },
    )
}
