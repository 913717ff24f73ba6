//! Codec system for weir
//!
//! Decoders turn one raw byte record into one structured [`Event`]. Inputs own
//! a decoder and hand it every record they read.
//!
//! Decoding is best-effort: a malformed record yields `None` and the pipeline
//! moves on. A decoder never takes down a worker over one bad record.

pub mod json;
pub mod plain;

use crate::error::{Result, WeirError};
use crate::event::Event;

pub use json::JsonDecoder;
pub use plain::PlainDecoder;

/// Decoder trait - turns a raw byte record into an Event
///
/// Implementations must be non-blocking and must not retain the input buffer
/// beyond the call; the caller may reuse or discard it immediately after.
///
/// # Return Value
///
/// - `Some(event)` - the record decoded cleanly
/// - `None` - the record was malformed or empty; skip it and continue
pub trait Decoder: Send + Sync {
    /// Decoder name for identification and logging
    fn name(&self) -> &'static str;

    /// Decode one raw record into an Event
    fn decode(&self, buf: &[u8]) -> Option<Event>;
}

/// Resolve a codec name from configuration into a decoder instance.
///
/// Unknown names are a configuration error, surfaced at startup.
pub fn new_decoder(name: &str) -> Result<Box<dyn Decoder>> {
    match name {
        "plain" => Ok(Box::new(PlainDecoder)),
        "json" => Ok(Box::new(JsonDecoder)),
        other => Err(WeirError::Config(format!("unknown codec '{other}'"))),
    }
}
