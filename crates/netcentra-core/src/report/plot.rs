//! Histogram images for each centrality measure.
//!
//! Each chart carries a caption naming the measure, an x-axis label and a
//! `Frequency` y-axis label. Text is rendered with a bundled DejaVu Sans
//! face, so no system fonts are needed.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::register_font;
use tracing::{debug, instrument};

use super::{commit, ensure_dir};
use crate::error::AnalysisError;
use crate::histogram::Histogram;
use crate::metrics::{CentralityTable, Measure};
use crate::progress::Stage;

/// Output image size in pixels.
pub const IMAGE_SIZE: (u32, u32) = (640, 480);

const FONT_FAMILY: &str = "sans-serif";
const FONT_BYTES: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

/// File name of the histogram for `measure`.
#[must_use]
pub fn distribution_file(measure: Measure) -> String {
    format!("{}_distribution.png", measure.name())
}

/// Chart caption for `measure`.
#[must_use]
pub fn distribution_title(measure: Measure) -> String {
    format!("Distribution of {} centrality", measure.name())
}

/// Register the bundled face under the default family once per process.
fn ensure_font() -> Result<(), &'static str> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    let ok = *REGISTERED
        .get_or_init(|| register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES).is_ok());
    if ok {
        Ok(())
    } else {
        Err("bundled font could not be loaded")
    }
}

fn plot_err(path: &Path, err: impl std::fmt::Display) -> AnalysisError {
    AnalysisError::Plot {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Draw the labelled bar chart for `hist` onto `root`.
#[allow(clippy::cast_precision_loss)]
fn draw_histogram<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    hist: &Histogram,
    measure: Measure,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let y_top = (hist.max_count() as f64 * 1.05).max(1.0);
    let mut chart = ChartBuilder::on(root)
        .caption(distribution_title(measure), (FONT_FAMILY, 22))
        .margin(16)
        .x_label_area_size(44)
        .y_label_area_size(56)
        .build_cartesian_2d(hist.min..hist.max, 0.0..y_top)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(measure.name())
        .y_desc("Frequency")
        .draw()?;

    chart.draw_series(hist.counts.iter().enumerate().map(|(i, &count)| {
        let (lo, hi) = hist.bin_range(i);
        Rectangle::new([(lo, 0.0), (hi, count as f64)], BLUE.mix(0.7).filled())
    }))?;

    Ok(())
}

/// Render `hist` for `measure` as a PNG bar chart at `path`.
///
/// The image is drawn to a hidden sibling and renamed into place, so a
/// failed render never leaves a file under `path`.
///
/// # Errors
///
/// Returns [`AnalysisError::Plot`] if the font cannot be loaded or the
/// backend fails to draw or encode, or [`AnalysisError::Io`] if the finished
/// image cannot be moved into place.
pub fn render_histogram(
    hist: &Histogram,
    measure: Measure,
    path: &Path,
) -> Result<(), AnalysisError> {
    ensure_font().map_err(|e| plot_err(path, e))?;
    commit(
        path,
        |tmp| {
            let root = BitMapBackend::new(tmp, IMAGE_SIZE).into_drawing_area();
            draw_histogram(&root, hist, measure).map_err(|e| plot_err(path, e))?;
            root.present().map_err(|e| plot_err(path, e))
        },
        |e| AnalysisError::io(Stage::Plot, path, e),
    )
}

/// Render one histogram per measure into `dir`.
///
/// Stops at the first failure.
///
/// # Errors
///
/// Returns [`AnalysisError::Io`] if `dir` cannot be created, or the first
/// render error.
#[instrument(skip(table), fields(rows = table.len()))]
pub fn plot_distributions(
    table: &CentralityTable,
    dir: &Path,
    bins: usize,
) -> Result<Vec<PathBuf>, AnalysisError> {
    ensure_dir(dir, Stage::Plot)?;

    let mut written = Vec::with_capacity(Measure::ALL.len());
    for measure in Measure::ALL {
        let hist = Histogram::from_values(table.column(measure), bins);
        let path = dir.join(distribution_file(measure));
        render_histogram(&hist, measure, &path)?;
        debug!(%measure, path = %path.display(), "histogram rendered");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn table() -> CentralityTable {
        CentralityTable::new(
            vec!["A".into(), "B".into(), "C".into()],
            vec![0.5, 1.0, 0.5],
            vec![0.0, 1.0, 0.0],
            vec![0.25, 0.5, 0.25],
        )
    }

    #[test]
    fn renders_three_pngs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let plots = dir.path().join("plots");

        let written = plot_distributions(&table(), &plots, 50).expect("plot");
        assert_eq!(written.len(), 3);
        for path in &written {
            let bytes = fs::read(path).expect("read png");
            assert!(bytes.starts_with(PNG_MAGIC), "{} is not a PNG", path.display());
        }
        assert!(plots.join("pagerank_distribution.png").is_file());

        let leftovers: Vec<_> = fs::read_dir(&plots)
            .expect("read_dir")
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with(".tmp-"))
            .collect();
        assert!(leftovers.is_empty());
    }

    /// Render into an RGB buffer instead of a file.
    fn draw_to_buffer(hist: &Histogram, measure: Measure) -> Vec<u8> {
        ensure_font().expect("font");
        let (w, h) = IMAGE_SIZE;
        let mut buf = vec![0_u8; (w * h * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buf, IMAGE_SIZE).into_drawing_area();
            draw_histogram(&root, hist, measure).expect("draw");
            root.present().expect("present");
        }
        buf
    }

    /// RGB bytes of rows `rows` restricted to columns `cols`.
    fn band(buf: &[u8], rows: std::ops::Range<usize>, cols: std::ops::Range<usize>) -> Vec<u8> {
        let width = IMAGE_SIZE.0 as usize;
        rows.flat_map(|y| buf[(y * width + cols.start) * 3..(y * width + cols.end) * 3].to_vec())
            .collect()
    }

    #[test]
    fn bundled_font_registers() {
        assert_eq!(ensure_font(), Ok(()));
    }

    #[test]
    fn caption_names_the_measure() {
        assert_eq!(
            distribution_title(Measure::Betweenness),
            "Distribution of betweenness centrality"
        );

        let hist = Histogram::from_values(&[0.0, 0.5, 1.0], 10);
        let degree = draw_to_buffer(&hist, Measure::Degree);
        let pagerank = draw_to_buffer(&hist, Measure::Pagerank);

        // The caption band above the plot holds nothing but the title text.
        let title_band = |buf: &[u8]| band(buf, 0..40, 150..490);
        assert!(title_band(&degree).iter().any(|&b| b < 128), "caption not drawn");
        assert_ne!(title_band(&degree), title_band(&pagerank));
    }

    #[test]
    fn empty_table_still_renders() {
        let dir = tempfile::tempdir().expect("tempdir");
        let written = plot_distributions(&CentralityTable::default(), dir.path(), 50)
            .expect("plot");
        assert_eq!(written.len(), 3);
    }

    #[test]
    fn plots_dir_blocked_by_file_aborts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("plots");
        fs::write(&blocker, b"x").expect("write");

        let err = plot_distributions(&table(), &blocker, 50).expect_err("must fail");
        match err {
            AnalysisError::Io { stage, path, .. } => {
                assert_eq!(stage, Stage::Plot);
                assert_eq!(path, blocker);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
