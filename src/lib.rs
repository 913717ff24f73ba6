//! WEIR - Pluggable Event Pipeline
//!
//! A streaming event pipeline whose inputs and outputs are named, swappable
//! plugins, selected and configured entirely from a configuration tree.
//!
//! # Architecture
//!
//! ```text
//! Input Plugins ──► decode ──► OutputsProcessor ──► OutputBox... (ordered fan-out)
//! ```
//!
//! Inputs produce one event at a time from a byte source; every event is
//! offered to each configured output in declaration order, gated by that
//! output's condition filter. The core never knows a concrete plugin type:
//! the [`registry::PluginRegistry`] maps config-supplied names to
//! constructors.

#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::panic)]

pub mod codec;
pub mod config;
pub mod error;
pub mod event;
pub mod fanout;
pub mod filter;
pub mod input;
pub mod metrics;
pub mod metrics_server;
pub mod output;
pub mod pipeline;
pub mod registry;

pub use config::Config;
pub use error::{PluginError, Result, WeirError};
pub use event::Event;
pub use fanout::{OutputBox, OutputsProcessor};
pub use filter::{AlwaysPass, ConditionFilter, FnFilter};
pub use input::{Input, StdinInput};
pub use output::{NullOutput, Output, StdoutOutput};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use registry::PluginRegistry;
