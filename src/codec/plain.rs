//! Plain text decoder
//!
//! The whole record becomes the `message` field of the event, stamped with
//! the decode time. This is the default codec for line-oriented inputs.

use crate::codec::Decoder;
use crate::event::{self, Event};

/// Plain decoder - one record, one `message` field
pub struct PlainDecoder;

impl Decoder for PlainDecoder {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn decode(&self, buf: &[u8]) -> Option<Event> {
        if buf.is_empty() {
            return None;
        }
        Some(event::text_event(String::from_utf8_lossy(buf)))
    }
}
