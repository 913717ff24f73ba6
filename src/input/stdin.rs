//! Line-oriented stream input, with stdin as the stock source
//!
//! [`LineInput`] is the reference input implementation: a single ordered byte
//! stream read one newline-delimited record at a time. [`StdinInput`] is the
//! registered `stdin` plugin, a `LineInput` over the process's standard input.

use crate::codec::{self, Decoder};
use crate::event::Event;
use crate::input::Input;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::Mutex;
use tracing::{debug, error};

/// Delay before reporting "no event" once the source is exhausted.
///
/// Without this, a pipeline polling an EOF'd input (stdin closed with C-d,
/// file fully consumed) spins a core at 100%.
pub const EOF_BACKOFF: Duration = Duration::from_secs(1);

/// Configuration for the `stdin` input
#[derive(Debug, Deserialize)]
pub struct StdinConfig {
    /// Codec used to decode each line (default: `plain`)
    #[serde(default = "default_codec")]
    pub codec: String,
}

fn default_codec() -> String {
    "plain".to_string()
}

/// Reference input: newline-delimited records from a buffered byte stream
///
/// Exactly one logical reader exists per instance. The reader sits behind a
/// mutex, so concurrent `read_one_event` callers are serialized and every
/// record is returned exactly once.
pub struct LineInput<R> {
    name: &'static str,
    reader: Mutex<R>,
    decoder: Box<dyn Decoder>,
    stopping: AtomicBool,
}

impl<R> LineInput<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    /// Create a line input over `reader`, decoding records with `decoder`
    pub fn new(name: &'static str, reader: R, decoder: Box<dyn Decoder>) -> Self {
        Self {
            name,
            reader: Mutex::new(reader),
            decoder,
            stopping: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl<R> Input for LineInput<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    fn name(&self) -> &'static str {
        self.name
    }

    async fn read_one_event(&self) -> Option<Event> {
        let mut reader = self.reader.lock().await;

        // Fresh buffer per call: the record must never alias the stream's
        // internal buffer, which the next read may overwrite.
        let mut record = Vec::new();
        match reader.read_until(b'\n', &mut record).await {
            Ok(0) => {
                // Clean end of stream. Back off before handing the caller
                // another None, while still holding the reader: with N
                // pollers, the aggregate nil rate stays bounded too.
                tokio::time::sleep(EOF_BACKOFF).await;
                None
            }
            Ok(_) => {
                if record.last() == Some(&b'\n') {
                    record.pop();
                    if record.last() == Some(&b'\r') {
                        record.pop();
                    }
                }
                drop(reader);
                let event = self.decoder.decode(&record);
                if event.is_none() {
                    debug!(
                        input = self.name,
                        codec = self.decoder.name(),
                        bytes = record.len(),
                        "record skipped by decoder"
                    );
                    crate::metrics::try_record_dropped("decode", 1);
                }
                event
            }
            Err(e) => {
                error!(input = self.name, error = %e, "read error");
                None
            }
        }
    }

    fn shutdown(&self) {
        // Stop producing new events; the in-flight read, if any, finishes on
        // its own terms.
        self.stopping.store(true, Ordering::Relaxed);
    }

    fn is_stopping(&self) -> bool {
        self.stopping.load(Ordering::Relaxed)
    }
}

/// The `stdin` input plugin
pub type StdinInput = LineInput<BufReader<Stdin>>;

impl StdinInput {
    /// Build a stdin input from its configuration block.
    ///
    /// Recognizes one option, `codec`, defaulting to `plain`.
    pub fn from_config(config: &serde_json::Value) -> crate::error::Result<Box<dyn Input>> {
        let stdin_config: StdinConfig = serde_json::from_value(config.clone())
            .map_err(|e| crate::error::WeirError::Config(format!("stdin input: {e}")))?;
        let decoder = codec::new_decoder(&stdin_config.codec)?;
        Ok(Box::new(LineInput::new(
            "stdin",
            BufReader::new(tokio::io::stdin()),
            decoder,
        )))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::codec::PlainDecoder;
    use crate::event::MESSAGE_KEY;
    use std::collections::HashSet;
    use std::sync::Arc;
    use tokio::time::Instant;

    fn line_input(data: &'static [u8]) -> LineInput<&'static [u8]> {
        LineInput::new("test", data, Box::new(PlainDecoder))
    }

    fn message_of(event: &Event) -> String {
        event
            .get(MESSAGE_KEY)
            .and_then(|v| v.as_str())
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_reads_records_in_order() {
        let input = line_input(b"first\nsecond\nthird\n");

        assert_eq!(message_of(&input.read_one_event().await.unwrap()), "first");
        assert_eq!(message_of(&input.read_one_event().await.unwrap()), "second");
        assert_eq!(message_of(&input.read_one_event().await.unwrap()), "third");
    }

    #[tokio::test]
    async fn test_strips_crlf() {
        let input = line_input(b"windows line\r\n");
        assert_eq!(
            message_of(&input.read_one_event().await.unwrap()),
            "windows line"
        );
    }

    #[tokio::test]
    async fn test_last_record_without_newline() {
        let input = line_input(b"no trailing newline");
        assert_eq!(
            message_of(&input.read_one_event().await.unwrap()),
            "no trailing newline"
        );
    }

    #[tokio::test]
    async fn test_blank_record_propagates_decoder_nil() {
        // A blank line decodes to None; that is not an error, just no event.
        let input = line_input(b"\nreal\n");
        assert!(input.read_one_event().await.is_none());
        assert_eq!(message_of(&input.read_one_event().await.unwrap()), "real");
    }

    #[tokio::test(start_paused = true)]
    async fn test_eof_backs_off_before_returning_none() {
        let input = line_input(b"only\n");
        assert!(input.read_one_event().await.is_some());

        let start = Instant::now();
        assert!(input.read_one_event().await.is_none());
        assert!(start.elapsed() >= EOF_BACKOFF);
    }

    #[tokio::test]
    async fn test_concurrent_readers_no_dups_no_drops() {
        let mut data = String::new();
        for i in 0..50 {
            data.push_str(&format!("record-{i}\n"));
        }
        let input: Arc<LineInput<&[u8]>> = Arc::new(LineInput::new(
            "test",
            Box::leak(data.into_boxed_str()).as_bytes(),
            Box::new(PlainDecoder),
        ));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let input = Arc::clone(&input);
            handles.push(tokio::spawn(async move {
                let mut seen = Vec::new();
                while let Some(event) = input.read_one_event().await {
                    seen.push(message_of(&event));
                }
                seen
            }));
        }

        let mut union = HashSet::new();
        let mut total = 0;
        for handle in handles {
            for message in handle.await.unwrap() {
                union.insert(message);
                total += 1;
            }
        }

        // Every record seen exactly once across all callers.
        assert_eq!(total, 50);
        assert_eq!(union.len(), 50);
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_after_shutdown_does_not_panic() {
        let input = line_input(b"one\n");
        input.shutdown();
        input.shutdown(); // idempotent

        assert!(input.is_stopping());
        // Buffered data may still come out; exhaustion yields None. Neither
        // call is allowed to panic.
        assert!(input.read_one_event().await.is_some());
        assert!(input.read_one_event().await.is_none());
    }

    #[tokio::test]
    async fn test_stdin_config_defaults_to_plain() {
        let config: StdinConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(config.codec, "plain");
    }

    #[tokio::test]
    async fn test_stdin_config_rejects_bad_shape() {
        let result = StdinInput::from_config(&serde_json::json!({"codec": ["not", "a", "string"]}));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_stdin_config_unknown_codec_is_config_error() {
        let result = StdinInput::from_config(&serde_json::json!({"codec": "avro"}));
        let Err(err) = result else {
            panic!("expected an error");
        };
        assert!(matches!(err, crate::error::WeirError::Config(_)));
    }
}
