pub mod analyze;
pub mod completions;
pub mod stats;

use netcentra_core::progress::{ProgressObserver, SilentObserver, TracingObserver};
use netcentra_core::timing::StageTimings;

/// Progress sink for a command: silent under `--quiet`, logged otherwise.
pub fn observer(quiet: bool) -> Box<dyn ProgressObserver> {
    if quiet {
        Box::new(SilentObserver)
    } else {
        Box::new(TracingObserver)
    }
}

/// Print a per-stage timing report to stderr.
pub fn report_timings(timings: &StageTimings) -> anyhow::Result<()> {
    if timings.is_empty() {
        eprintln!("timing report: no samples recorded");
    } else {
        eprintln!("timing report:");
        eprintln!("{}", timings.display_table());
        eprintln!("timing report (json):");
        eprintln!("{}", serde_json::to_string_pretty(&timings.to_json())?);
    }
    Ok(())
}
