//! Prometheus metrics.
//!
//! Label values come from closed sets (input, intent and phase kinds), so
//! no cardinality protection is needed beyond using the `kind()` names.

use std::sync::atomic::{AtomicBool, Ordering};

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::error::MatchWardenError;
use crate::phase::MatchPhase;

/// Guard to prevent double-initialization of the metrics recorder.
static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initializes the global metrics recorder.
///
/// With `Some(port)`, a Prometheus HTTP listener is started on
/// `127.0.0.1:<port>`; with `None` the recorder is installed without one.
///
/// # Errors
///
/// Returns `MatchWardenError::Io` if the recorder or listener cannot be
/// installed (e.g. port already in use).
pub fn init_metrics(port: Option<u16>) -> Result<(), MatchWardenError> {
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
    .map_err(|e| MatchWardenError::Io(std::io::Error::other(e.to_string())))?;

    describe_metrics();
    Ok(())
}

fn describe_metrics() {
    describe_counter!(
        "matchwarden_inputs_total",
        "Engine inputs handled, by kind"
    );
    describe_counter!(
        "matchwarden_intents_total",
        "Intents issued by the engine, by kind"
    );
    describe_counter!(
        "matchwarden_phase_transitions_total",
        "Match phase transitions"
    );
    describe_gauge!(
        "matchwarden_current_phase",
        "Current match phase (1 = active)"
    );
    describe_gauge!(
        "matchwarden_participants_active",
        "Connected participants assigned to a side"
    );
}

/// Records a handled input.
pub fn record_input(kind: &'static str) {
    counter!("matchwarden_inputs_total", "kind" => kind).increment(1);
}

/// Records an issued intent.
pub fn record_intent(kind: &'static str) {
    counter!("matchwarden_intents_total", "kind" => kind).increment(1);
}

/// Records a phase transition and moves the current-phase gauge.
pub fn record_phase_transition(from: MatchPhase, to: MatchPhase) {
    counter!(
        "matchwarden_phase_transitions_total",
        "from" => from.as_str(),
        "to" => to.as_str()
    )
    .increment(1);
    set_current_phase(to);
}

/// Sets the current-phase gauge: 1 for `phase`, 0 for every other phase.
pub fn set_current_phase(phase: MatchPhase) {
    for candidate in MatchPhase::ALL {
        let value = if candidate == phase { 1.0 } else { 0.0 };
        gauge!("matchwarden_current_phase", "phase" => candidate.as_str()).set(value);
    }
}

/// Sets the active participant gauge.
#[allow(clippy::cast_precision_loss)]
pub fn set_participants_active(count: usize) {
    gauge!("matchwarden_participants_active").set(count as f64);
}
