//! The Event type flowing through the pipeline
//!
//! An event is a flat-to-nested mapping from string keys to dynamically typed
//! values, produced by a [`Decoder`](crate::codec::Decoder) and consumed by
//! filters and outputs. Events are plain values: stages clone or borrow them
//! as convenient, and no two stages ever mutate one concurrently.

use serde_json::Value;

/// A decoded record: string keys to dynamically typed values.
///
/// # Example
///
/// ```
/// use weir::event::{text_event, MESSAGE_KEY};
///
/// let event = text_event("hello");
/// assert_eq!(event.get(MESSAGE_KEY).and_then(|v| v.as_str()), Some("hello"));
/// ```
pub type Event = serde_json::Map<String, Value>;

/// Key holding the raw record text for plain-decoded events.
pub const MESSAGE_KEY: &str = "message";

/// Key holding the decode timestamp, RFC 3339 formatted.
pub const TIMESTAMP_KEY: &str = "@timestamp";

/// Build an event carrying `text` under [`MESSAGE_KEY`] plus a decode
/// timestamp.
pub fn text_event(text: impl Into<String>) -> Event {
    let mut event = Event::new();
    event.insert(MESSAGE_KEY.to_string(), Value::String(text.into()));
    stamp(&mut event);
    event
}

/// Insert the current time under [`TIMESTAMP_KEY`], leaving an existing
/// timestamp untouched (a decoder may have extracted one from the record).
pub fn stamp(event: &mut Event) {
    if !event.contains_key(TIMESTAMP_KEY) {
        event.insert(
            TIMESTAMP_KEY.to_string(),
            Value::String(chrono::Utc::now().to_rfc3339()),
        );
    }
}
