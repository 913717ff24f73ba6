//! Prometheus metrics for weir

use crate::error::{Result, WeirError};
use prometheus::{Counter, CounterVec, Encoder, TextEncoder, register_counter_vec};
use std::sync::OnceLock;

/// Global metrics instance
static METRICS: OnceLock<Metrics> = OnceLock::new();

/// Reserved config key naming a per-output counter
pub const COUNTER_KEY: &str = "prometheus_counter";

/// All weir metrics
pub struct Metrics {
    /// Events read (by input)
    pub events_read: CounterVec,

    /// Events emitted (by output)
    pub events_emitted: CounterVec,

    /// Events dropped (by reason)
    pub events_dropped: CounterVec,

    /// Emit failures (by output)
    pub emit_failures: CounterVec,

    /// Per-output counters configured via the `prometheus_counter` key
    pub output_counters: CounterVec,
}

impl Metrics {
    /// Initialize metrics (call once at startup)
    ///
    /// Returns error if metric registration fails.
    pub fn init() -> Result<&'static Metrics> {
        if let Some(metrics) = METRICS.get() {
            return Ok(metrics);
        }

        let metrics = Metrics {
            events_read: register_counter_vec!(
                "weir_events_read_total",
                "Total events read from inputs",
                &["input"]
            )
            .map_err(|e| WeirError::Metrics(format!("events_read: {e}")))?,

            events_emitted: register_counter_vec!(
                "weir_events_emitted_total",
                "Total events emitted to outputs",
                &["output"]
            )
            .map_err(|e| WeirError::Metrics(format!("events_emitted: {e}")))?,

            events_dropped: register_counter_vec!(
                "weir_events_dropped_total",
                "Total events dropped",
                &["reason"]
            )
            .map_err(|e| WeirError::Metrics(format!("events_dropped: {e}")))?,

            emit_failures: register_counter_vec!(
                "weir_emit_failures_total",
                "Total emit failures",
                &["output"]
            )
            .map_err(|e| WeirError::Metrics(format!("emit_failures: {e}")))?,

            output_counters: register_counter_vec!(
                "weir_output_counter",
                "User-configured per-output event counters",
                &["name"]
            )
            .map_err(|e| WeirError::Metrics(format!("output_counters: {e}")))?,
        };

        // Set the metrics (only succeeds once)
        let _ = METRICS.set(metrics);

        METRICS
            .get()
            .ok_or_else(|| WeirError::Metrics("failed to initialize metrics".to_string()))
    }

    /// Get the global metrics instance
    ///
    /// Returns None if metrics haven't been initialized yet.
    pub fn get() -> Option<&'static Metrics> {
        METRICS.get()
    }

    /// Record an event read from an input
    pub fn record_read(&self, input: &str) {
        self.events_read.with_label_values(&[input]).inc();
    }

    /// Record an event emitted to an output
    pub fn record_emitted(&self, output: &str) {
        self.events_emitted.with_label_values(&[output]).inc();
    }

    /// Record dropped events
    pub fn record_dropped(&self, reason: &str, count: u64) {
        self.events_dropped
            .with_label_values(&[reason])
            .inc_by(count as f64);
    }

    /// Record an emit failure
    pub fn record_emit_failure(&self, output: &str) {
        self.emit_failures.with_label_values(&[output]).inc();
    }
}

/// Derive the optional per-output counter from an output's config block.
///
/// The reserved `prometheus_counter` key names the counter; a block without
/// it gets no counter. A non-string value is a configuration error.
pub fn counter_from_config(config: &serde_json::Value) -> Result<Option<Counter>> {
    let Some(value) = config.get(COUNTER_KEY) else {
        return Ok(None);
    };
    let name = value.as_str().ok_or_else(|| {
        WeirError::Config(format!("{COUNTER_KEY} must be a string, got: {value}"))
    })?;
    Ok(Metrics::get().map(|m| m.output_counters.with_label_values(&[name])))
}

/// Gather all metrics and encode as Prometheus text format
///
/// Returns the metrics as a String, ready to be served via HTTP.
pub fn gather() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_ok() {
        String::from_utf8(buffer).unwrap_or_default()
    } else {
        String::new()
    }
}

/// Helper to record an input read if metrics are initialized, otherwise skip
pub fn try_record_read(input: &str) {
    if let Some(m) = Metrics::get() {
        m.record_read(input);
    }
}

/// Helper to record an emitted event if metrics are initialized, otherwise skip
pub fn try_record_emitted(output: &str) {
    if let Some(m) = Metrics::get() {
        m.record_emitted(output);
    }
}

/// Helper to record dropped events if metrics are initialized, otherwise skip
pub fn try_record_dropped(reason: &str, count: u64) {
    if let Some(m) = Metrics::get() {
        m.record_dropped(reason, count);
    }
}

/// Helper to record an emit failure if metrics are initialized, otherwise skip
pub fn try_record_emit_failure(output: &str) {
    if let Some(m) = Metrics::get() {
        m.record_emit_failure(output);
    }
}
