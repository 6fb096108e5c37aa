//! Pipeline stages and the injectable progress channel.
//!
//! The pipeline never prints. Every "Computing …" style message is routed
//! through a [`ProgressObserver`], so the CLI can log through `tracing`,
//! `--quiet` runs stay silent, and tests can capture what was reported.

use std::fmt;

use serde::Serialize;
use tracing::info;

/// One step of the analysis pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Load,
    Clean,
    BasicStats,
    Centralities,
    Correlation,
    Plot,
    Save,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Self; 7] = [
        Self::Load,
        Self::Clean,
        Self::BasicStats,
        Self::Centralities,
        Self::Correlation,
        Self::Plot,
        Self::Save,
    ];

    /// Stable snake_case name used in logs, errors and timing reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Clean => "clean",
            Self::BasicStats => "basic_stats",
            Self::Centralities => "centralities",
            Self::Correlation => "correlation",
            Self::Plot => "plot",
            Self::Save => "save",
        }
    }

    /// Progress line announced when the stage starts.
    #[must_use]
    pub const fn headline(self) -> &'static str {
        match self {
            Self::Load => "Loading graph...",
            Self::Clean => "Preprocessing graph...",
            Self::BasicStats => "Computing basic stats...",
            Self::Centralities => "Computing centralities...",
            Self::Correlation => "Computing correlation matrix...",
            Self::Plot => "Plotting centrality distributions...",
            Self::Save => "Saving results...",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Receiver for progress events emitted while the pipeline runs.
pub trait ProgressObserver {
    /// Called once when `stage` begins.
    fn stage_started(&mut self, stage: Stage) {
        self.message(stage.headline());
    }

    /// A free-form progress message (e.g. "Computing PageRank...").
    fn message(&mut self, message: &str);
}

/// Forwards progress to `tracing` at INFO level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ProgressObserver for TracingObserver {
    fn stage_started(&mut self, stage: Stage) {
        info!(stage = stage.name(), "{}", stage.headline());
    }

    fn message(&mut self, message: &str) {
        info!("{message}");
    }
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl ProgressObserver for SilentObserver {
    fn stage_started(&mut self, _stage: Stage) {}

    fn message(&mut self, _message: &str) {}
}

/// Keeps every message in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    pub stages: Vec<Stage>,
    pub messages: Vec<String>,
}

impl ProgressObserver for RecordingObserver {
    fn stage_started(&mut self, stage: Stage) {
        self.stages.push(stage);
        self.message(stage.headline());
    }

    fn message(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}
