//! Text and CSV result files.
//!
//! Layout under the results directory:
//!
//! ```text
//! basic_stats.txt
//! centralities.csv
//! centrality_correlation.csv
//! top_nodes/top{N}_{measure}.csv
//! ```
//!
//! Floats are written by the `csv` serializer in shortest round-trip form,
//! so reading a file back yields bit-identical `f64` values. NaN is written
//! as `NaN`.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use super::{commit, ensure_dir};
use crate::config::{AnalysisConfig, TOP_NODES_DIR};
use crate::correlation::CorrelationMatrix;
use crate::error::AnalysisError;
use crate::graph::stats::BasicStats;
use crate::metrics::{CentralityTable, Measure};
use crate::progress::Stage;

pub const BASIC_STATS_FILE: &str = "basic_stats.txt";
pub const CENTRALITIES_FILE: &str = "centralities.csv";
pub const CORRELATION_FILE: &str = "centrality_correlation.csv";

/// Name of the ranking file for `measure` keeping `n` rows.
#[must_use]
pub fn top_nodes_file(measure: Measure, n: usize) -> String {
    format!("top{n}_{}.csv", measure.name())
}

fn save_err(path: &Path) -> impl FnOnce(io::Error) -> AnalysisError + '_ {
    move |e| AnalysisError::io(Stage::Save, path, e)
}

fn write_text(
    path: &Path,
    fill: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>,
) -> Result<(), AnalysisError> {
    commit(
        path,
        |tmp| {
            let mut out = BufWriter::new(File::create(tmp).map_err(save_err(path))?);
            fill(&mut out)
                .and_then(|()| out.flush())
                .map_err(save_err(path))
        },
        save_err(path),
    )
}

fn write_csv(
    path: &Path,
    fill: impl FnOnce(&mut csv::Writer<File>) -> csv::Result<()>,
) -> Result<(), AnalysisError> {
    commit(
        path,
        |tmp| {
            let mut wtr = csv::Writer::from_path(tmp).map_err(|e| save_err(path)(e.into()))?;
            fill(&mut wtr)
                .and_then(|()| wtr.flush().map_err(csv::Error::from))
                .map_err(|e| save_err(path)(e.into()))
        },
        save_err(path),
    )
}

/// `key: value` per statistic, in declaration order.
///
/// # Errors
///
/// Returns [`AnalysisError::Io`] naming `path` if the file cannot be written.
pub fn write_basic_stats(path: &Path, stats: &BasicStats) -> Result<(), AnalysisError> {
    write_text(path, |out| {
        for (key, value) in stats.entries() {
            writeln!(out, "{key}: {value}")?;
        }
        Ok(())
    })
}

/// One row per node: `node,degree,betweenness,pagerank`.
///
/// # Errors
///
/// Returns [`AnalysisError::Io`] naming `path` if the file cannot be written.
pub fn write_centralities(path: &Path, table: &CentralityTable) -> Result<(), AnalysisError> {
    write_csv(path, |wtr| {
        if table.is_empty() {
            wtr.write_record(["node", "degree", "betweenness", "pagerank"])?;
        }
        for row in table.rows() {
            wtr.serialize(row)?;
        }
        Ok(())
    })
}

/// The 3×3 matrix with a blank corner cell and measure-name labels.
///
/// # Errors
///
/// Returns [`AnalysisError::Io`] naming `path` if the file cannot be written.
pub fn write_correlation(path: &Path, matrix: &CorrelationMatrix) -> Result<(), AnalysisError> {
    write_csv(path, |wtr| {
        let mut header = vec![""];
        header.extend(Measure::ALL.iter().map(|m| m.name()));
        wtr.write_record(&header)?;

        for (measure, row) in Measure::ALL.iter().zip(matrix.rows()) {
            wtr.serialize((measure.name(), row[0], row[1], row[2]))?;
        }
        Ok(())
    })
}

/// Write `top{n}_{measure}.csv` for every measure into `dir`.
///
/// # Errors
///
/// Returns [`AnalysisError::Io`] if `dir` cannot be created or a file cannot
/// be written.
pub fn write_top_nodes(
    dir: &Path,
    table: &CentralityTable,
    n: usize,
) -> Result<Vec<PathBuf>, AnalysisError> {
    ensure_dir(dir, Stage::Save)?;

    Measure::ALL
        .iter()
        .map(|&measure| {
            let path = dir.join(top_nodes_file(measure, n));
            write_csv(&path, |wtr| {
                wtr.write_record(["node", measure.name()])?;
                for (node, value) in table.top_n(measure, n) {
                    wtr.serialize((node, value))?;
                }
                Ok(())
            })?;
            Ok(path)
        })
        .collect()
}

/// Read a `centralities.csv` file back into a table.
///
/// # Errors
///
/// Returns the underlying `csv` error for unreadable or malformed files.
pub fn read_centralities(path: &Path) -> csv::Result<CentralityTable> {
    let mut rdr = csv::Reader::from_path(path)?;
    let mut nodes = Vec::new();
    let mut columns: [Vec<f64>; 3] = Default::default();

    for record in rdr.deserialize::<(String, f64, f64, f64)>() {
        let (node, degree, betweenness, pagerank) = record?;
        nodes.push(node);
        columns[0].push(degree);
        columns[1].push(betweenness);
        columns[2].push(pagerank);
    }

    let [degree, betweenness, pagerank] = columns;
    Ok(CentralityTable::new(nodes, degree, betweenness, pagerank))
}

/// Writes every tabular result into one results directory.
#[derive(Debug, Clone)]
pub struct ResultWriter {
    results_dir: PathBuf,
    top_nodes_dir: PathBuf,
    top_n: usize,
}

impl ResultWriter {
    /// Writer for `results_dir`, with rankings under its `top_nodes/`.
    #[must_use]
    pub fn new(results_dir: impl Into<PathBuf>, top_n: usize) -> Self {
        let results_dir = results_dir.into();
        Self {
            top_nodes_dir: results_dir.join(TOP_NODES_DIR),
            results_dir,
            top_n,
        }
    }

    /// Writer using the output layout and ranking size of `config`.
    #[must_use]
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            results_dir: config.results_dir.clone(),
            top_nodes_dir: config.top_nodes_dir(),
            top_n: config.top_n,
        }
    }

    #[must_use]
    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    /// Write all text and CSV outputs, returning the paths written.
    ///
    /// Stops at the first failure; files already written stay in place.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Io`] naming the directory or file that
    /// failed.
    #[instrument(skip_all, fields(dir = %self.results_dir.display()))]
    pub fn write_all(
        &self,
        stats: &BasicStats,
        table: &CentralityTable,
        correlation: &CorrelationMatrix,
    ) -> Result<Vec<PathBuf>, AnalysisError> {
        ensure_dir(&self.results_dir, Stage::Save)?;

        let stats_path = self.results_dir.join(BASIC_STATS_FILE);
        write_basic_stats(&stats_path, stats)?;

        let centralities_path = self.results_dir.join(CENTRALITIES_FILE);
        write_centralities(&centralities_path, table)?;

        let correlation_path = self.results_dir.join(CORRELATION_FILE);
        write_correlation(&correlation_path, correlation)?;

        let mut written = vec![stats_path, centralities_path, correlation_path];
        written.extend(write_top_nodes(&self.top_nodes_dir, table, self.top_n)?);

        debug!(files = written.len(), "results written");
        Ok(written)
    }
}
