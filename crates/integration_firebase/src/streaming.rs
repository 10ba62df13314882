//! Realtime Database change feed parsing
//!
//! The database streams changes as server-sent events. Because every change
//! triggers a full re-read of the favorites set, only the event kind
//! matters here; payloads are not interpreted. Events can split across
//! transport chunks, so the parser buffers incomplete lines.

use std::pin::Pin;

use futures::stream::{self, Stream, StreamExt};
use reqwest::Response;
use tracing::{trace, warn};

/// A server-sent event kind from the change feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEvent {
    /// Data at the watched path was set
    Put,
    /// Data at the watched path was partially updated
    Patch,
    /// Periodic no-op to keep the connection alive
    KeepAlive,
    /// The server is closing the stream
    Cancel,
    /// The auth token expired; the stream must be reopened
    AuthRevoked,
}

impl StreamEvent {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "put" => Some(Self::Put),
            "patch" => Some(Self::Patch),
            "keep-alive" => Some(Self::KeepAlive),
            "cancel" => Some(Self::Cancel),
            "auth_revoked" => Some(Self::AuthRevoked),
            _ => None,
        }
    }
}

/// Stream of parsed change events
pub type ChangeStream = Pin<Box<dyn Stream<Item = StreamEvent> + Send>>;

/// Incremental server-sent-event parser
///
/// Feed it raw transport chunks; it emits an event for every complete
/// `event:`/blank-line block and keeps partial lines buffered until the
/// next chunk completes them.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: String,
    pending_event: Option<String>,
}

impl SseParser {
    /// Create an empty parser
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a transport chunk and return the events it completed
    pub fn push(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        let mut events = Vec::new();
        while let Some(newline) = self.buffer.find('\n') {
            let line = self.buffer[..newline].trim_end_matches('\r').to_string();
            self.buffer.drain(..=newline);

            if let Some(name) = line.strip_prefix("event:") {
                self.pending_event = Some(name.trim().to_string());
            } else if line.is_empty() {
                // Blank line dispatches the pending event.
                if let Some(name) = self.pending_event.take() {
                    match StreamEvent::from_name(&name) {
                        Some(event) => {
                            trace!(event = %name, "Change feed event");
                            events.push(event);
                        },
                        None => warn!(event = %name, "Ignoring unknown change feed event"),
                    }
                }
            }
            // `data:` lines and comments are not interpreted.
        }
        events
    }
}

/// Turn an event-stream HTTP response into a stream of parsed events
///
/// Transport errors end the stream; the subscriber reopens if it wants to
/// keep listening.
pub(crate) fn create_change_stream(response: Response) -> ChangeStream {
    let mut parser = SseParser::new();
    let events = response
        .bytes_stream()
        .map(move |result| match result {
            Ok(bytes) => parser.push(&bytes),
            Err(e) => {
                warn!(error = %e, "Change feed transport error");
                Vec::new()
            },
        })
        .flat_map(stream::iter);

    Box::pin(events)
}
