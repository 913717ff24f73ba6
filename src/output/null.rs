//! Null output - discards every event
//!
//! Useful for benchmarking the pipeline without sink I/O and for validating
//! routing and filter configuration.

use crate::error::PluginError;
use crate::event::Event;
use crate::output::Output;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};

/// Null output - counts and drops
pub struct NullOutput {
    emit_count: AtomicU64,
}

impl NullOutput {
    /// Create a null output
    pub fn new() -> Self {
        Self {
            emit_count: AtomicU64::new(0),
        }
    }

    /// Build a null output from its (empty) configuration block
    pub fn from_config(_config: &serde_json::Value) -> crate::error::Result<Box<dyn Output>> {
        Ok(Box::new(Self::new()))
    }

    /// Total events discarded
    pub fn emit_count(&self) -> u64 {
        self.emit_count.load(Ordering::Relaxed)
    }
}

impl Default for NullOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Output for NullOutput {
    fn name(&self) -> &'static str {
        "null"
    }

    async fn emit(&self, _event: &Event) -> Result<(), PluginError> {
        self.emit_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
