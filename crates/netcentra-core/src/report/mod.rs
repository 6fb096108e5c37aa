//! Result files: text and CSV tables plus histogram images.
//!
//! Everything under the results directory is written to a hidden staging
//! file next to its destination and renamed into place once complete, so an
//! interrupted run never leaves a truncated file under a final name.

pub mod plot;
pub mod writer;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::AnalysisError;
use crate::progress::Stage;

pub use plot::{plot_distributions, render_histogram};
pub use writer::{
    ResultWriter, read_centralities, write_basic_stats, write_centralities, write_correlation,
    write_top_nodes,
};

/// Hidden sibling of `path` used while the file is being produced.
///
/// The extension is kept (`.tmp-name.png`) so format-sniffing encoders
/// still pick the right codec.
pub(crate) fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "out".into(), |n| n.to_string_lossy().into_owned());
    path.with_file_name(format!(".tmp-{name}"))
}

/// Create `dir` (and parents) or fail with a stage-tagged error.
pub(crate) fn ensure_dir(dir: &Path, stage: Stage) -> Result<(), AnalysisError> {
    fs::create_dir_all(dir).map_err(|e| AnalysisError::io(stage, dir, e))
}

/// Run `produce` against the staging path, then rename over `path`.
///
/// On failure the staging file is removed and the error is returned.
pub(crate) fn commit<E>(
    path: &Path,
    produce: impl FnOnce(&Path) -> Result<(), E>,
    on_rename_error: impl FnOnce(io::Error) -> E,
) -> Result<(), E> {
    let tmp = staging_path(path);
    let outcome = produce(&tmp).and_then(|()| fs::rename(&tmp, path).map_err(on_rename_error));
    if outcome.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    outcome
}
