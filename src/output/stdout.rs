//! Stdout output
//!
//! Prints each event to stdout as one line of JSON. Useful for development,
//! debugging, and piping into other tools.

use crate::error::PluginError;
use crate::event::Event;
use crate::output::Output;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Configuration for the `stdout` output
#[derive(Debug, Default, Deserialize)]
pub struct StdoutConfig {
    /// Pretty-print events over multiple lines (default: compact)
    #[serde(default)]
    pub pretty: bool,
}

/// Stdout output - prints events as JSON lines
pub struct StdoutOutput {
    pretty: bool,
    emit_count: AtomicU64,
}

impl StdoutOutput {
    /// Create a compact-printing stdout output
    pub fn new() -> Self {
        Self {
            pretty: false,
            emit_count: AtomicU64::new(0),
        }
    }

    /// Build a stdout output from its configuration block
    pub fn from_config(config: &serde_json::Value) -> crate::error::Result<Box<dyn Output>> {
        let stdout_config: StdoutConfig = serde_json::from_value(config.clone())
            .map_err(|e| crate::error::WeirError::Config(format!("stdout output: {e}")))?;
        Ok(Box::new(Self {
            pretty: stdout_config.pretty,
            emit_count: AtomicU64::new(0),
        }))
    }

    /// Total events emitted
    pub fn emit_count(&self) -> u64 {
        self.emit_count.load(Ordering::Relaxed)
    }
}

impl Default for StdoutOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Output for StdoutOutput {
    fn name(&self) -> &'static str {
        "stdout"
    }

    async fn emit(&self, event: &Event) -> Result<(), PluginError> {
        use std::io::Write;

        let rendered = if self.pretty {
            serde_json::to_string_pretty(event)
        } else {
            serde_json::to_string(event)
        }
        .map_err(|e| PluginError::Emit(e.to_string()))?;

        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{rendered}").map_err(|e| PluginError::Emit(e.to_string()))?;

        self.emit_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
