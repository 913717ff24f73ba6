//! Configuration for weir
//!
//! Two layers: process-level settings from environment variables (addresses,
//! logging), and the pipeline definition - a dynamic JSON tree naming the
//! input and output plugins - loaded from the file `WEIR_PIPELINE` points at.

use crate::error::{Result, WeirError};
use serde_json::Value;
use std::env;
use std::net::SocketAddr;
use std::path::Path;

/// Process-level configuration for weir
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the pipeline definition file
    pub pipeline_path: String,

    /// Metrics server address
    pub metrics_addr: SocketAddr,

    /// Log level
    pub log_level: String,

    /// Log format (json or pretty)
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pipeline_path: "pipeline.json".to_string(),
            metrics_addr: SocketAddr::from(([0, 0, 0, 0], 9090)),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(path) = env::var("WEIR_PIPELINE") {
            config.pipeline_path = path;
        }

        if let Ok(addr) = env::var("WEIR_METRICS_ADDR") {
            config.metrics_addr = addr
                .parse()
                .map_err(|e| WeirError::Config(format!("invalid WEIR_METRICS_ADDR: {e}")))?;
        }

        if let Ok(level) = env::var("WEIR_LOG_LEVEL") {
            config.log_level = level;
        }

        if let Ok(format) = env::var("WEIR_LOG_FORMAT") {
            config.log_format = match format.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" => LogFormat::Pretty,
                other => {
                    return Err(WeirError::Config(format!(
                        "invalid WEIR_LOG_FORMAT: {other} (expected 'json' or 'pretty')"
                    )));
                }
            };
        }

        Ok(config)
    }
}

/// Load the pipeline definition from a JSON file.
///
/// The tree is kept dynamic: plugin config blocks are handed to constructors
/// as-is, and each constructor decides what its block must look like.
pub fn load_pipeline(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|e| {
        WeirError::Config(format!("cannot read pipeline file {}: {e}", path.display()))
    })?;
    let root: Value = serde_json::from_str(&raw).map_err(|e| {
        WeirError::Config(format!("pipeline file {} is not valid JSON: {e}", path.display()))
    })?;
    if !root.is_object() {
        return Err(WeirError::Config(format!(
            "pipeline file {} must hold a JSON object",
            path.display()
        )));
    }
    Ok(root)
}
