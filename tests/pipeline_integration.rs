//! Integration tests for the configured pipeline
//!
//! These tests build pipelines from configuration trees the way the binary
//! does - registry lookups, output boxes, filters, counters - and push events
//! through the whole chain.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use weir::codec::PlainDecoder;
use weir::event::{Event, text_event};
use weir::filter::{ConditionFilter, FnFilter};
use weir::input::LineInput;
use weir::output::Output;
use weir::pipeline::PipelineBuilder;
use weir::registry::PluginRegistry;
use weir::{PluginError, WeirError};

// ============================================================================
// Test doubles
// ============================================================================

/// Output that counts emits and records its name in a shared invocation log
struct TrackingOutput {
    name: &'static str,
    emit_count: Arc<AtomicU64>,
    log: Arc<Mutex<Vec<&'static str>>>,
}

#[async_trait]
impl Output for TrackingOutput {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn emit(&self, _event: &Event) -> Result<(), PluginError> {
        self.emit_count.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(self.name);
        Ok(())
    }
}

/// Register a `tracking` output type whose instances share one counter + log
fn register_tracking(
    registry: &mut PluginRegistry,
    type_name: &'static str,
    log: &Arc<Mutex<Vec<&'static str>>>,
) -> Arc<AtomicU64> {
    let emit_count = Arc::new(AtomicU64::new(0));
    let captured_count = Arc::clone(&emit_count);
    let captured_log = Arc::clone(log);
    registry
        .register_output(
            type_name,
            Box::new(move |_config| {
                Ok(Box::new(TrackingOutput {
                    name: type_name,
                    emit_count: Arc::clone(&captured_count),
                    log: Arc::clone(&captured_log),
                }))
            }),
        )
        .unwrap();
    emit_count
}

// ============================================================================
// Configuration-driven construction
// ============================================================================

#[tokio::test]
async fn test_stdout_and_null_each_emit_once() {
    let _ = weir::metrics::Metrics::init();

    let registry = PluginRegistry::builtin();
    let config = json!({
        "outputs": [
            {"stdout": {"prometheus_counter": "integration_stdout"}},
            {"null": {"prometheus_counter": "integration_null"}}
        ]
    });

    let outputs = PipelineBuilder::new(&registry)
        .build_outputs(&config)
        .unwrap();
    assert_eq!(outputs.len(), 2);

    let stdout_counter = weir::metrics::counter_from_config(&json!({
        "prometheus_counter": "integration_stdout"
    }))
    .unwrap()
    .unwrap();
    let null_counter = weir::metrics::counter_from_config(&json!({
        "prometheus_counter": "integration_null"
    }))
    .unwrap()
    .unwrap();

    let stdout_before = stdout_counter.get();
    let null_before = null_counter.get();

    outputs.process(&text_event("one event, two sinks")).await;

    assert_eq!((stdout_counter.get() - stdout_before) as u64, 1);
    assert_eq!((null_counter.get() - null_before) as u64, 1);
}

#[tokio::test]
async fn test_unknown_output_type_fails_before_any_event_flows() {
    let registry = PluginRegistry::builtin();
    let config = json!({
        "outputs": [ {"stdout": {}}, {"clickhouse": {}} ]
    });

    let err = PipelineBuilder::new(&registry)
        .build_outputs(&config)
        .unwrap_err();
    assert!(matches!(err, WeirError::Config(_)));
    assert!(err.to_string().contains("clickhouse"));
}

// ============================================================================
// Ordered, filtered fan-out
// ============================================================================

#[tokio::test]
async fn test_rejected_box_is_skipped_others_deliver_in_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut registry = PluginRegistry::builtin();
    let a_count = register_tracking(&mut registry, "sink_a", &log);
    let b_count = register_tracking(&mut registry, "sink_b", &log);
    let c_count = register_tracking(&mut registry, "sink_c", &log);

    // sink_a's condition rejects everything; sink_b and sink_c accept.
    let config = json!({
        "outputs": [
            {"sink_a": {"if": "reject"}},
            {"sink_b": {}},
            {"sink_c": {}}
        ]
    });

    let outputs = PipelineBuilder::new(&registry)
        .filter_builder(Box::new(|condition| {
            let reject = condition == &json!("reject");
            let filter: Arc<dyn ConditionFilter> =
                Arc::new(FnFilter::new(move |_: &Event| !reject));
            Ok(filter)
        }))
        .build_outputs(&config)
        .unwrap();

    outputs.process(&text_event("selective")).await;

    assert_eq!(a_count.load(Ordering::SeqCst), 0);
    assert_eq!(b_count.load(Ordering::SeqCst), 1);
    assert_eq!(c_count.load(Ordering::SeqCst), 1);
    assert_eq!(*log.lock().unwrap(), vec!["sink_b", "sink_c"]);
}

// ============================================================================
// Full read → decode → fan-out run
// ============================================================================

#[tokio::test]
async fn test_pipeline_drains_input_to_all_outputs() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut registry = PluginRegistry::builtin();
    let first_count = register_tracking(&mut registry, "first", &log);
    let second_count = register_tracking(&mut registry, "second", &log);

    registry
        .register_input(
            "memory",
            Box::new(|_config| {
                Ok(Box::new(LineInput::new(
                    "memory",
                    &b"alpha\nbeta\ngamma\n"[..],
                    Box::new(PlainDecoder),
                )))
            }),
        )
        .unwrap();

    let config = json!({
        "inputs": [ {"memory": {}} ],
        "outputs": [ {"first": {}}, {"second": {}} ]
    });

    let pipeline = PipelineBuilder::new(&registry).build(&config).unwrap();
    pipeline
        .run(tokio::time::sleep(Duration::from_millis(300)))
        .await
        .unwrap();

    // Three records, fanned out to both sinks.
    assert_eq!(first_count.load(Ordering::SeqCst), 3);
    assert_eq!(second_count.load(Ordering::SeqCst), 3);

    // Per event, declaration order held.
    let log = log.lock().unwrap();
    assert_eq!(log.len(), 6);
    for pair in log.chunks(2) {
        assert_eq!(pair, ["first", "second"]);
    }
}

#[tokio::test]
async fn test_blank_records_are_skipped_not_fatal() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut registry = PluginRegistry::builtin();
    let count = register_tracking(&mut registry, "sink", &log);

    registry
        .register_input(
            "memory",
            Box::new(|_config| {
                Ok(Box::new(LineInput::new(
                    "memory",
                    &b"kept\n\nalso kept\n"[..],
                    Box::new(PlainDecoder),
                )))
            }),
        )
        .unwrap();

    let config = json!({
        "inputs": [ {"memory": {}} ],
        "outputs": [ {"sink": {}} ]
    });

    let pipeline = PipelineBuilder::new(&registry).build(&config).unwrap();
    pipeline
        .run(tokio::time::sleep(Duration::from_millis(300)))
        .await
        .unwrap();

    // The blank line decodes to no event; the worker carries on.
    assert_eq!(count.load(Ordering::SeqCst), 2);
}
