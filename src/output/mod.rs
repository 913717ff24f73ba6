//! Output plugin system for weir
//!
//! Outputs deliver events to sinks (stdout, /dev/null, a remote store, ...).
//! The pipeline never calls an Output directly: each one is wrapped in an
//! [`OutputBox`](crate::fanout::OutputBox) that adds condition filtering and
//! an optional metrics counter.

pub mod null;
pub mod stdout;

use crate::error::PluginError;
use crate::event::Event;
use async_trait::async_trait;

pub use null::NullOutput;
pub use stdout::StdoutOutput;

/// Output trait - delivers events to a sink
///
/// Delivery failures are this output's own concern: retry, buffering, and
/// circuit-breaking all belong inside the implementation. The surrounding
/// fan-out logs an `emit` error and moves on.
#[async_trait]
pub trait Output: Send + Sync {
    /// Output name for identification and logging
    fn name(&self) -> &'static str;

    /// Deliver one event to the sink
    async fn emit(&self, event: &Event) -> Result<(), PluginError>;

    /// Graceful shutdown
    ///
    /// Called when the pipeline is shutting down to flush buffers, close
    /// connections, etc.
    async fn shutdown(&self) -> Result<(), PluginError> {
        Ok(())
    }
}
