//! Per-stage wall-clock timings for one analysis run.

use std::time::{Duration, Instant};

use serde_json::json;

use crate::progress::Stage;

/// Elapsed time for each pipeline stage that ran, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageTimings {
    entries: Vec<(Stage, Duration)>,
}

/// Returns true when `NETCENTRA_TIMING` asks for a timing report.
///
/// Supported truthy values: `1`, `true`, `yes`, `on` (case-insensitive).
#[must_use]
pub fn timing_enabled_from_env() -> bool {
    std::env::var("NETCENTRA_TIMING")
        .ok()
        .is_some_and(|value| is_truthy(value.as_str()))
}

impl StageTimings {
    /// Run `f`, recording how long it took under `stage`.
    pub fn time<R>(&mut self, stage: Stage, f: impl FnOnce() -> R) -> R {
        let started = Instant::now();
        let result = f();
        self.record(stage, started.elapsed());
        result
    }

    /// Record an externally measured duration.
    pub fn record(&mut self, stage: Stage, elapsed: Duration) {
        self.entries.push((stage, elapsed));
    }

    /// Recorded `(stage, elapsed)` pairs.
    #[must_use]
    pub fn entries(&self) -> &[(Stage, Duration)] {
        &self.entries
    }

    /// Sum of all recorded stages.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.entries.iter().map(|(_, d)| *d).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as JSON: `{"stages": [{"stage": .., "elapsed_us": ..}], "total_us": ..}`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let stages = self
            .entries
            .iter()
            .map(|(stage, elapsed)| {
                json!({
                    "stage": stage.name(),
                    "elapsed_us": elapsed.as_micros(),
                })
            })
            .collect::<Vec<_>>();

        json!({ "stages": stages, "total_us": self.total().as_micros() })
    }

    /// Render as a simple table for terminal output.
    #[must_use]
    pub fn display_table(&self) -> String {
        if self.entries.is_empty() {
            return "No timing samples recorded.".to_string();
        }

        let mut out = String::new();
        out.push_str("stage                 elapsed\n");
        out.push_str("-----------------------------\n");

        for (stage, elapsed) in &self.entries {
            out.push_str(&format!(
                "{:<18} {:>10}\n",
                stage.name(),
                format_duration(*elapsed)
            ));
        }
        out.push_str(&format!("{:<18} {:>10}\n", "total", format_duration(self.total())));

        out
    }
}

fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();

    if micros >= 1_000_000 {
        let secs = micros / 1_000_000;
        let millis = (micros % 1_000_000) / 1_000;
        format!("{secs}.{millis:03}s")
    } else if micros >= 1_000 {
        let millis = micros / 1_000;
        let rem = micros % 1_000;
        format!("{millis}.{rem:03}ms")
    } else {
        format!("{micros}µs")
    }
}

fn is_truthy(value: &str) -> bool {
    ["1", "true", "yes", "on"]
        .iter()
        .any(|t| value.eq_ignore_ascii_case(t))
}
