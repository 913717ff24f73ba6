//! weir - pluggable event pipeline
//!
//! Reads events from configured inputs and fans them out to configured
//! outputs.
//!
//! ## Usage
//!
//! ```bash
//! # Run with the pipeline definition in ./pipeline.json
//! cargo run
//!
//! # Point at a different pipeline and turn up logging
//! WEIR_PIPELINE=/etc/weir/pipeline.json WEIR_LOG_LEVEL=debug cargo run
//! ```
//!
//! ## Environment Variables
//!
//! - `WEIR_PIPELINE`: pipeline definition file (default: "pipeline.json")
//! - `WEIR_METRICS_ADDR`: metrics server address (default: "0.0.0.0:9090")
//! - `WEIR_LOG_LEVEL`: log level (default: "info")
//! - `WEIR_LOG_FORMAT`: "json" or "pretty" (default: "pretty")

use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use weir::config::{Config, LogFormat};
use weir::metrics::Metrics;
use weir::metrics_server::MetricsServer;
use weir::pipeline::PipelineBuilder;
use weir::registry::PluginRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }

    info!(
        pipeline = %config.pipeline_path,
        metrics_addr = %config.metrics_addr,
        "starting weir"
    );

    // Metrics and the scrape endpoint
    Metrics::init()?;
    let metrics_handle = MetricsServer::start(config.metrics_addr);

    // Initialization phase: all plugin types register before any pipeline
    // is built.
    let registry = PluginRegistry::builtin();

    // Build the pipeline from configuration. Any unknown type name or
    // malformed block aborts here, before a single event flows.
    let root = weir::config::load_pipeline(&config.pipeline_path)?;
    let pipeline = PipelineBuilder::new(&registry).build(&root)?;

    pipeline.run(shutdown_signal()).await?;

    metrics_handle.abort();
    info!("weir shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = ?e, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = ?e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
