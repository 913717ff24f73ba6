//! Input plugin system for weir
//!
//! An input produces one event at a time from an external byte source, using
//! a [`Decoder`](crate::codec::Decoder) internally. Inputs are registered by
//! name and constructed from a configuration block at pipeline startup.

pub mod stdin;

use crate::event::Event;
use async_trait::async_trait;

pub use stdin::{LineInput, StdinInput};

/// Input trait - produces Events one at a time
///
/// # Contract
///
/// `read_one_event` may block waiting for data. `None` means "no event
/// available right now" and covers both a transient empty read and an
/// unrecoverable read error; the caller's only valid reaction is to retry
/// later. Concurrent callers on the same instance are safe: the underlying
/// read is serialized so no record is split or duplicated across callers.
#[async_trait]
pub trait Input: Send + Sync {
    /// Input name for identification and logging
    fn name(&self) -> &'static str;

    /// Read and decode the next event from the source
    async fn read_one_event(&self) -> Option<Event>;

    /// Signal the input to stop producing new events
    ///
    /// Asynchronous and idempotent; never blocks and never aborts an
    /// in-flight read. The worker loop consults [`Input::is_stopping`]
    /// between reads.
    fn shutdown(&self);

    /// Whether `shutdown` has been requested
    fn is_stopping(&self) -> bool;
}
