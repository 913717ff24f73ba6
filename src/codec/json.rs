//! JSON decoder
//!
//! Parses each record as a JSON object. Records that are not valid JSON
//! objects are skipped; the pipeline keeps running.

use crate::codec::Decoder;
use crate::event::{self, Event};
use serde_json::Value;
use tracing::debug;

/// JSON decoder - one record, one JSON object
pub struct JsonDecoder;

impl Decoder for JsonDecoder {
    fn name(&self) -> &'static str {
        "json"
    }

    fn decode(&self, buf: &[u8]) -> Option<Event> {
        match serde_json::from_slice::<Value>(buf) {
            Ok(Value::Object(mut map)) => {
                event::stamp(&mut map);
                Some(map)
            }
            Ok(other) => {
                debug!(kind = ?other, "record is not a JSON object, skipping");
                None
            }
            Err(e) => {
                debug!(error = %e, "record is not valid JSON, skipping");
                None
            }
        }
    }
}
