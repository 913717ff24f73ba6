//! Pipeline construction and the read → decode → fan-out loop
//!
//! [`PipelineBuilder`] turns the dynamic configuration tree into live
//! plugins: the `inputs` and `outputs` keys each hold an ordered list of
//! single-entry maps `{type_name: config_block}`, resolved against a
//! [`PluginRegistry`]. Every output lands inside an
//! [`OutputBox`](crate::fanout::OutputBox) with its condition filter and
//! optional counter.
//!
//! [`Pipeline::run`] drives one worker task per input: read one event, offer
//! it to every output box, repeat until shutdown.

use crate::error::{Result, WeirError};
use crate::fanout::{OutputBox, OutputsProcessor};
use crate::filter::{AlwaysPass, ConditionFilter};
use crate::input::Input;
use crate::metrics;
use crate::registry::PluginRegistry;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Reserved config key holding an output's condition
pub const CONDITION_KEY: &str = "if";

/// How long workers get to wind down after the shutdown signal before their
/// tasks are aborted. Inputs blocked on a quiet source would otherwise hold
/// process exit hostage.
const WORKER_GRACE: Duration = Duration::from_secs(2);

/// Builds a condition filter from the value of the reserved `if` key
pub type FilterBuilder = Box<dyn Fn(&Value) -> Result<Arc<dyn ConditionFilter>> + Send + Sync>;

/// Pipeline builder - resolves configuration against a plugin registry
///
/// # Example
///
/// ```
/// use weir::pipeline::PipelineBuilder;
/// use weir::registry::PluginRegistry;
///
/// let registry = PluginRegistry::builtin();
/// let config = serde_json::json!({
///     "outputs": [ {"stdout": {}}, {"null": {}} ]
/// });
/// let outputs = PipelineBuilder::new(&registry).build_outputs(&config).unwrap();
/// assert_eq!(outputs.len(), 2);
/// ```
pub struct PipelineBuilder<'a> {
    registry: &'a PluginRegistry,
    filter_builder: FilterBuilder,
}

impl<'a> PipelineBuilder<'a> {
    /// Create a builder over `registry`
    ///
    /// Without an installed filter builder, outputs whose config omits the
    /// `if` key pass everything, and a present `if` key is a configuration
    /// error - the condition evaluator is a collaborator this crate does not
    /// ship.
    pub fn new(registry: &'a PluginRegistry) -> Self {
        Self {
            registry,
            filter_builder: Box::new(|condition| {
                Err(WeirError::Config(format!(
                    "no condition evaluator installed, cannot build filter from: {condition}"
                )))
            }),
        }
    }

    /// Install the collaborator that turns `if` values into filters
    pub fn filter_builder(mut self, builder: FilterBuilder) -> Self {
        self.filter_builder = builder;
        self
    }

    /// Build all inputs from the root config's `inputs` list
    ///
    /// The pipeline needs at least one input; an empty or missing list is a
    /// configuration error, as is any unregistered type name.
    pub fn build_inputs(&self, root: &Value) -> Result<Vec<Arc<dyn Input>>> {
        let entries = plugin_entries(root, "inputs")?;
        if entries.is_empty() {
            return Err(WeirError::Config("pipeline has no inputs".to_string()));
        }

        let mut inputs: Vec<Arc<dyn Input>> = Vec::with_capacity(entries.len());
        for (type_name, config) in entries {
            info!(input = %type_name, "building input");
            inputs.push(Arc::from(self.registry.build_input(type_name, config)?));
        }
        Ok(inputs)
    }

    /// Build the fan-out stage from the root config's `outputs` list
    ///
    /// Declaration order is preserved: it is the order events are offered to
    /// sinks for the pipeline's whole lifetime.
    pub fn build_outputs(&self, root: &Value) -> Result<OutputsProcessor> {
        let entries = plugin_entries(root, "outputs")?;
        if entries.is_empty() {
            return Err(WeirError::Config("pipeline has no outputs".to_string()));
        }

        let mut boxes = Vec::with_capacity(entries.len());
        for (type_name, config) in entries {
            info!(output = %type_name, "building output");
            let output = self.registry.build_output(type_name, config)?;

            let filter: Arc<dyn ConditionFilter> = match config.get(CONDITION_KEY) {
                Some(condition) => (self.filter_builder)(condition)?,
                None => Arc::new(AlwaysPass),
            };
            let counter = metrics::counter_from_config(config)?;

            boxes.push(OutputBox::new(output, filter, counter));
        }
        Ok(OutputsProcessor::new(boxes))
    }

    /// Build the full pipeline: inputs plus the fan-out stage
    pub fn build(&self, root: &Value) -> Result<Pipeline> {
        Ok(Pipeline {
            inputs: self.build_inputs(root)?,
            outputs: Arc::new(self.build_outputs(root)?),
        })
    }
}

/// Parse an ordered list of `{type_name: config_block}` entries under `key`
fn plugin_entries<'v>(root: &'v Value, key: &str) -> Result<Vec<(&'v str, &'v Value)>> {
    let Some(value) = root.get(key) else {
        return Err(WeirError::Config(format!("config has no '{key}' list")));
    };
    let list = value
        .as_array()
        .ok_or_else(|| WeirError::Config(format!("'{key}' must be a list")))?;

    let mut entries = Vec::with_capacity(list.len());
    for item in list {
        let map = item.as_object().ok_or_else(|| {
            WeirError::Config(format!("'{key}' entries must be single-entry maps"))
        })?;
        if map.len() != 1 {
            return Err(WeirError::Config(format!(
                "'{key}' entries must hold exactly one type, got {} keys",
                map.len()
            )));
        }
        let (type_name, config) = map.iter().next().ok_or_else(|| {
            WeirError::Config(format!("'{key}' entries must hold exactly one type"))
        })?;
        entries.push((type_name.as_str(), config));
    }
    Ok(entries)
}

/// A built pipeline: inputs wired to the fan-out stage
pub struct Pipeline {
    inputs: Vec<Arc<dyn Input>>,
    outputs: Arc<OutputsProcessor>,
}

impl Pipeline {
    /// Assemble a pipeline from already-built parts
    pub fn new(inputs: Vec<Arc<dyn Input>>, outputs: OutputsProcessor) -> Self {
        Self {
            inputs,
            outputs: Arc::new(outputs),
        }
    }

    /// The fan-out stage, shared for monitoring or direct submission
    pub fn outputs(&self) -> &Arc<OutputsProcessor> {
        &self.outputs
    }

    /// Run the pipeline until `shutdown` resolves
    ///
    /// Spawns one worker per input. When `shutdown` fires, every input's
    /// `shutdown()` is invoked and workers stop at their next between-reads
    /// check; the signal never aborts an in-flight read. Workers that stay
    /// blocked on a quiet source past a grace period are aborted so the
    /// process can exit.
    pub async fn run(self, shutdown: impl Future<Output = ()>) -> Result<()> {
        info!(
            inputs = self.inputs.len(),
            outputs = self.outputs.len(),
            "pipeline started"
        );

        let (stop_tx, stop_rx) = watch::channel(false);

        let mut workers: Vec<(&'static str, JoinHandle<()>)> = Vec::new();
        for input in &self.inputs {
            let name = input.name();
            let handle = tokio::spawn(worker(
                Arc::clone(input),
                Arc::clone(&self.outputs),
                stop_rx.clone(),
            ));
            workers.push((name, handle));
        }

        shutdown.await;
        info!("shutdown signal received");

        for input in &self.inputs {
            input.shutdown();
        }
        let _ = stop_tx.send(true);

        for (name, mut handle) in workers {
            if tokio::time::timeout(WORKER_GRACE, &mut handle).await.is_err() {
                warn!(input = name, "worker still reading after grace period, aborting");
                handle.abort();
            }
        }

        self.outputs.shutdown().await;
        info!("pipeline shutdown complete");
        Ok(())
    }
}

/// One input's read → fan-out loop
///
/// The stopping state is consulted between reads only; this is the boundary
/// where an input's `shutdown()` takes effect.
async fn worker(
    input: Arc<dyn Input>,
    outputs: Arc<OutputsProcessor>,
    stop: watch::Receiver<bool>,
) {
    loop {
        if *stop.borrow() || input.is_stopping() {
            break;
        }
        match input.read_one_event().await {
            Some(event) => {
                metrics::try_record_read(input.name());
                outputs.process(&event).await;
            }
            // Nothing readable right now; the input paces its own retries.
            None => {}
        }
    }
    debug!(input = input.name(), "worker stopped");
}
