//! Filtered, metered fan-out of events to outputs
//!
//! [`OutputBox`] wraps one concrete [`Output`] with a condition filter and an
//! optional counter; the wrapped output knows about neither.
//! [`OutputsProcessor`] is the terminal pipeline stage: an ordered, immutable
//! collection of boxes, each offered every event in declared order.

use crate::event::Event;
use crate::filter::ConditionFilter;
use crate::metrics;
use crate::output::Output;
use prometheus::Counter;
use std::sync::Arc;
use tracing::error;

/// One output plus its filter and optional counter
///
/// The box owns its output exclusively; the filter (and the counter's value)
/// are shared with whoever else holds them.
pub struct OutputBox {
    output: Box<dyn Output>,
    filter: Arc<dyn ConditionFilter>,
    counter: Option<Counter>,
}

impl OutputBox {
    /// Wrap `output` with `filter` and an optional `counter`
    pub fn new(
        output: Box<dyn Output>,
        filter: Arc<dyn ConditionFilter>,
        counter: Option<Counter>,
    ) -> Self {
        Self {
            output,
            filter,
            counter,
        }
    }

    /// Name of the wrapped output
    pub fn name(&self) -> &'static str {
        self.output.name()
    }

    /// Offer one event to the wrapped output
    ///
    /// If the filter rejects the event, nothing happens for this sink. If it
    /// passes, the counter (when configured) is incremented exactly once and
    /// the event is emitted. Fire and forget: emit failures are logged here
    /// and never propagate to the caller.
    pub async fn process(&self, event: &Event) {
        if !self.filter.pass(event) {
            return;
        }
        if let Some(counter) = &self.counter {
            counter.inc();
        }
        match self.output.emit(event).await {
            Ok(()) => metrics::try_record_emitted(self.output.name()),
            Err(e) => {
                error!(output = self.output.name(), error = %e, "emit failed");
                metrics::try_record_emit_failure(self.output.name());
            }
        }
    }

    /// Shut down the wrapped output
    pub async fn shutdown(&self) {
        if let Err(e) = self.output.shutdown().await {
            error!(output = self.output.name(), error = %e, "error during output shutdown");
        }
    }
}

/// Ordered fan-out over all configured output boxes
///
/// The member order is fixed at construction and equals configuration
/// declaration order; it never changes at runtime. Fan-out is synchronous and
/// strictly sequential, so side effects across sinks for one event are
/// deterministic. The flip side is accepted: a slow output delays every
/// output after it, and nothing here times an emit out.
pub struct OutputsProcessor {
    boxes: Vec<OutputBox>,
}

impl std::fmt::Debug for OutputsProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputsProcessor")
            .field("boxes", &self.boxes.len())
            .finish()
    }
}

impl OutputsProcessor {
    /// Build the processor from boxes in declaration order
    pub fn new(boxes: Vec<OutputBox>) -> Self {
        Self { boxes }
    }

    /// Number of output boxes
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Whether there are no output boxes
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Offer one event to every box, in declared order
    pub async fn process(&self, event: &Event) {
        for output_box in &self.boxes {
            output_box.process(event).await;
        }
    }

    /// Shut down every box's output, in declared order
    pub async fn shutdown(&self) {
        for output_box in &self.boxes {
            output_box.shutdown().await;
        }
    }
}
