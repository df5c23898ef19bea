//! Metrics collection for `pqcsim`.
//!
//! Prometheus-compatible metrics behind the `metrics` facade. Without an
//! installed recorder every call is a no-op, so the simulator records
//! unconditionally.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::error::SimulatorError;

/// Guard to prevent double-initialization of the metrics recorder.
static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Phase labels beyond this index are bucketed to bound label cardinality
/// when a config file supplies a long catalog.
const MAX_PHASE_LABELS: usize = 16;

/// Returns the label used for a phase index.
#[must_use]
pub fn phase_label(index: usize) -> String {
    if index < MAX_PHASE_LABELS {
        index.to_string()
    } else {
        "__overflow__".to_owned()
    }
}

/// Initializes the global metrics recorder.
///
/// When `port` is `Some`, a Prometheus HTTP listener is started on
/// `127.0.0.1:<port>`. When `None`, the recorder is installed without an
/// HTTP endpoint.
///
/// # Errors
///
/// Returns `SimulatorError::Metrics` if the recorder or HTTP listener
/// cannot be installed (e.g. port already in use).
pub fn init_metrics(port: Option<u16>) -> Result<(), SimulatorError> {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        tracing::debug!("metrics already initialized, skipping");
        return Ok(());
    }
    port.map_or_else(
        || PrometheusBuilder::new().install_recorder().map(|_| ()),
        |p| {
            PrometheusBuilder::new()
                .with_http_listener(([127, 0, 0, 1], p))
                .install()
        },
    )
    .map_err(|e| SimulatorError::Metrics(e.to_string()))?;

    describe_metrics();
    Ok(())
}

/// Registers metric descriptions with the global recorder.
fn describe_metrics() {
    describe_counter!("pqcsim_runs_started_total", "Runs started");
    describe_counter!("pqcsim_runs_completed_total", "Runs that reached completion");
    describe_counter!("pqcsim_runs_reset_total", "Reset commands that discarded state");
    describe_counter!(
        "pqcsim_starts_ignored_total",
        "Start commands ignored because a run was in progress"
    );
    describe_histogram!(
        "pqcsim_phase_duration_ms",
        "Simulated phase duration in milliseconds"
    );
    describe_gauge!(
        "pqcsim_current_phase",
        "Phase cursor of the current run (-1 when idle)"
    );
}

/// Records a started run.
pub fn record_run_started(data_size: &str, pqc_complexity: &str) {
    counter!(
        "pqcsim_runs_started_total",
        "data_size" => data_size.to_owned(),
        "pqc_complexity" => pqc_complexity.to_owned(),
    )
    .increment(1);
}

/// Records an ignored `start` call.
pub fn record_start_ignored() {
    counter!("pqcsim_starts_ignored_total").increment(1);
}

/// Records a finished phase.
pub fn record_phase_duration(index: usize, duration: Duration) {
    histogram!("pqcsim_phase_duration_ms", "phase" => phase_label(index))
        .record(duration.as_secs_f64() * 1000.0);
}

/// Records a completed run.
pub fn record_run_completed() {
    counter!("pqcsim_runs_completed_total").increment(1);
}

/// Records a reset.
pub fn record_reset() {
    counter!("pqcsim_runs_reset_total").increment(1);
}

/// Sets the phase cursor gauge; `None` is reported as `-1`.
#[allow(clippy::cast_precision_loss)]
pub fn set_current_phase(index: Option<usize>) {
    gauge!("pqcsim_current_phase").set(index.map_or(-1.0, |i| i as f64));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_label_within_bound() {
        assert_eq!(phase_label(0), "0");
        assert_eq!(phase_label(15), "15");
    }

    #[test]
    fn phase_label_overflow_bucket() {
        assert_eq!(phase_label(16), "__overflow__");
        assert_eq!(phase_label(usize::MAX), "__overflow__");
    }

    #[test]
    fn recording_without_recorder_is_noop() {
        record_run_started("small", "standard");
        record_start_ignored();
        record_phase_duration(3, Duration::from_millis(1200));
        record_run_completed();
        record_reset();
        set_current_phase(None);
        set_current_phase(Some(2));
    }
}
