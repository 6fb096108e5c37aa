//! Run configuration.
//!
//! Every knob the pipeline reads lives in [`AnalysisConfig`], which is passed
//! explicitly into [`crate::pipeline::Pipeline`]. Values come from (lowest to
//! highest precedence) built-in defaults, a TOML file, and CLI flags.
//!
//! ```toml
//! input = "data/bio-CE-GN.edges"
//! directed = false
//! exact_betweenness = true
//! results_dir = "results"
//! top_n = 20
//!
//! [pagerank]
//! damping = 0.85
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::metrics::betweenness::BetweennessMode;
use crate::metrics::pagerank::PageRankConfig;

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "netcentra.toml";

/// Histogram subdirectory of `results_dir`.
pub const PLOTS_DIR: &str = "plots";

/// Top-N ranking subdirectory of `results_dir`.
pub const TOP_NODES_DIR: &str = "top_nodes";

/// What to do when the cleaned graph has no nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyGraphPolicy {
    /// Finish the run and write degenerate (empty / NaN) outputs.
    #[default]
    Degenerate,
    /// Abort with [`AnalysisError::EmptyGraph`].
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Edge-list file to analyse.
    pub input: PathBuf,
    /// Treat each line as a directed edge `source target`.
    pub directed: bool,
    /// Exact betweenness over all sources; otherwise sample pivots.
    pub exact_betweenness: bool,
    /// Root directory for every output file.
    pub results_dir: PathBuf,
    /// Rows per `top_nodes/top<N>_<measure>.csv` file.
    pub top_n: usize,
    /// Equal-width bins per histogram.
    pub histogram_bins: usize,
    /// Pivot count for approximate betweenness.
    pub betweenness_samples: usize,
    /// RNG seed for approximate betweenness.
    pub seed: u64,
    pub pagerank: PageRankConfig,
    pub empty_graph: EmptyGraphPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/bio-CE-GN.edges"),
            directed: false,
            exact_betweenness: true,
            results_dir: PathBuf::from("results"),
            top_n: 20,
            histogram_bins: 50,
            betweenness_samples: 100,
            seed: 42,
            pagerank: PageRankConfig::default(),
            empty_graph: EmptyGraphPolicy::default(),
        }
    }
}

impl AnalysisConfig {
    /// Default configuration reading `input` and writing into `results_dir`.
    #[must_use]
    pub fn new(input: impl Into<PathBuf>, results_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            results_dir: results_dir.into(),
            ..Self::default()
        }
    }

    /// Betweenness strategy implied by `exact_betweenness`.
    #[must_use]
    pub const fn betweenness_mode(&self) -> BetweennessMode {
        if self.exact_betweenness {
            BetweennessMode::Exact
        } else {
            BetweennessMode::Sampled {
                k: self.betweenness_samples,
                seed: self.seed,
            }
        }
    }

    /// Directory holding the histogram images.
    #[must_use]
    pub fn plots_dir(&self) -> PathBuf {
        self.results_dir.join(PLOTS_DIR)
    }

    /// Directory holding the top-N ranking files.
    #[must_use]
    pub fn top_nodes_dir(&self) -> PathBuf {
        self.results_dir.join(TOP_NODES_DIR)
    }
}

/// Parse a TOML config file.
///
/// # Errors
///
/// Returns [`AnalysisError::Config`] if the file cannot be read or is not
/// valid TOML for [`AnalysisConfig`].
pub fn load_config(path: &Path) -> Result<AnalysisConfig, AnalysisError> {
    let content = std::fs::read_to_string(path).map_err(|e| AnalysisError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    toml::from_str::<AnalysisConfig>(&content).map_err(|e| AnalysisError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Find the config file to use when none was given explicitly.
///
/// Looks for `netcentra.toml` in `cwd`, then `netcentra/config.toml` in the
/// user config directory.
#[must_use]
pub fn discover_config(cwd: &Path) -> Option<PathBuf> {
    let local = cwd.join(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    let user = dirs::config_dir()?.join("netcentra/config.toml");
    user.is_file().then_some(user)
}

/// Resolve the effective base configuration (before CLI overrides).
///
/// An explicit path must exist; a discovered one is used only if present;
/// otherwise defaults apply. Returns the config and the file it came from.
///
/// # Errors
///
/// Returns [`AnalysisError::Config`] if the chosen file is unreadable or
/// invalid.
pub fn resolve_config(
    explicit: Option<&Path>,
    cwd: &Path,
) -> Result<(AnalysisConfig, Option<PathBuf>), AnalysisError> {
    let source = explicit.map(Path::to_path_buf).or_else(|| discover_config(cwd));
    match source {
        Some(path) => Ok((load_config(&path)?, Some(path))),
        None => Ok((AnalysisConfig::default(), None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_run() {
        let cfg = AnalysisConfig::default();
        assert!(!cfg.directed);
        assert!(cfg.exact_betweenness);
        assert_eq!(cfg.top_n, 20);
        assert_eq!(cfg.histogram_bins, 50);
        assert_eq!(cfg.betweenness_samples, 100);
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.results_dir, PathBuf::from("results"));
        assert_eq!(cfg.empty_graph, EmptyGraphPolicy::Degenerate);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: AnalysisConfig = toml::from_str(
            r#"
            input = "net.edges"
            directed = true

            [pagerank]
            damping = 0.9
            "#,
        )
        .expect("parse");

        assert_eq!(cfg.input, PathBuf::from("net.edges"));
        assert!(cfg.directed);
        assert!((cfg.pagerank.damping - 0.9).abs() < f64::EPSILON);
        assert_eq!(cfg.pagerank.max_iter, 100);
        assert_eq!(cfg.top_n, 20);
    }

    #[test]
    fn unknown_keys_rejected() {
        let result = toml::from_str::<AnalysisConfig>("directd = true");
        assert!(result.is_err());
    }

    #[test]
    fn empty_graph_policy_parses_snake_case() {
        let cfg: AnalysisConfig = toml::from_str("empty_graph = \"reject\"").expect("parse");
        assert_eq!(cfg.empty_graph, EmptyGraphPolicy::Reject);
    }

    #[test]
    fn betweenness_mode_follows_flag() {
        let mut cfg = AnalysisConfig::default();
        assert_eq!(cfg.betweenness_mode(), BetweennessMode::Exact);

        cfg.exact_betweenness = false;
        assert_eq!(
            cfg.betweenness_mode(),
            BetweennessMode::Sampled { k: 100, seed: 42 }
        );
    }

    #[test]
    fn output_dirs_nest_under_results() {
        let cfg = AnalysisConfig::new("in.edges", "out");
        assert_eq!(cfg.plots_dir(), PathBuf::from("out/plots"));
        assert_eq!(cfg.top_nodes_dir(), PathBuf::from("out/top_nodes"));
    }

    #[test]
    fn load_config_reports_path_on_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "top_n = \"twenty\"").expect("write");

        let err = load_config(&path).expect_err("should fail");
        assert!(matches!(err, AnalysisError::Config { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn resolve_prefers_local_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(LOCAL_CONFIG_FILE), "top_n = 5").expect("write");

        let (cfg, source) = resolve_config(None, dir.path()).expect("resolve");
        assert_eq!(cfg.top_n, 5);
        assert_eq!(source, Some(dir.path().join(LOCAL_CONFIG_FILE)));
    }

    #[test]
    fn resolve_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.toml");
        assert!(resolve_config(Some(&missing), dir.path()).is_err());
    }
}
