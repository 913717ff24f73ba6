//! Error types for weir

use thiserror::Error;

/// Result type alias for weir operations
pub type Result<T> = std::result::Result<T, WeirError>;

/// Main error type for weir
///
/// Configuration errors are fatal: they surface during pipeline construction,
/// before any event flows. Everything that can go wrong afterwards is handled
/// locally by the component that hit it.
#[derive(Error, Debug)]
pub enum WeirError {
    /// Configuration error (unknown plugin type, malformed block, bad option)
    #[error("configuration error: {0}")]
    Config(String),

    /// Plugin error
    #[error("plugin '{plugin}' error: {message}")]
    Plugin { plugin: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Metrics error
    #[error("metrics error: {0}")]
    Metrics(String),

    /// Shutdown requested
    #[error("shutdown requested")]
    Shutdown,
}

/// Error type for plugin operations
#[derive(Error, Debug)]
pub enum PluginError {
    /// Initialization failed
    #[error("initialization failed: {0}")]
    Init(String),

    /// Decode failed
    #[error("decode failed: {0}")]
    Decode(String),

    /// Emit failed
    #[error("emit failed: {0}")]
    Emit(String),

    /// Shutdown error
    #[error("shutdown error: {0}")]
    Shutdown(String),
}

impl From<PluginError> for WeirError {
    fn from(err: PluginError) -> Self {
        WeirError::Plugin {
            plugin: "unknown".to_string(),
            message: err.to_string(),
        }
    }
}
