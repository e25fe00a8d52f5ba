//! Wire encodings for the re-framer.

use bytes::Bytes;
use gateway_types::StreamChunk;

use super::formatters::{content_chunk, sse_line, stop_chunk};
use crate::gateway::common::generate_random_id;

pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";
pub const SSE_CONTENT_TYPE: &str = "text/event-stream";

/// One outbound framing. `frame` is called once per chunk in arrival order,
/// `tail` once after a clean end of stream.
pub trait FrameSink: Send {
    fn content_type(&self) -> &'static str;

    fn frame(&mut self, chunk: &StreamChunk) -> Option<Bytes>;

    fn tail(&mut self) -> Option<Bytes>;
}

/// One JSON array of parts per line. Finish-only chunks produce no line.
#[derive(Debug, Default)]
pub struct NdjsonSink;

impl FrameSink for NdjsonSink {
    fn content_type(&self) -> &'static str {
        NDJSON_CONTENT_TYPE
    }

    fn frame(&mut self, chunk: &StreamChunk) -> Option<Bytes> {
        if !chunk.has_parts() {
            return None;
        }
        let mut line = serde_json::to_vec(&chunk.parts).ok()?;
        line.push(b'\n');
        Some(Bytes::from(line))
    }

    fn tail(&mut self) -> Option<Bytes> {
        None
    }
}

/// OpenAI chat-completion-chunk events.
///
/// Every event gets its own id, `chatcmpl-<stream prefix>-<seq>`, with `seq` counting up from 1,
/// and a `created` stamp that never goes backwards.
///
/// Only text survives: inline and file parts have no representation in this envelope
/// and are omitted.
#[derive(Debug)]
pub struct SseSink {
    id_prefix: String,
    seq: u64,
    last_created: i64,
    model: String,
}

impl SseSink {
    pub fn new(model: &str) -> Self {
        Self {
            id_prefix: format!("chatcmpl-{}", generate_random_id()),
            seq: 0,
            last_created: 0,
            model: model.to_string(),
        }
    }

    /// Shared prefix of every event id in this stream.
    pub fn id_prefix(&self) -> &str {
        &self.id_prefix
    }

    fn next_envelope(&mut self, now: i64) -> (String, i64) {
        self.seq += 1;
        self.last_created = self.last_created.max(now);
        (format!("{}-{}", self.id_prefix, self.seq), self.last_created)
    }
}

impl FrameSink for SseSink {
    fn content_type(&self) -> &'static str {
        SSE_CONTENT_TYPE
    }

    fn frame(&mut self, chunk: &StreamChunk) -> Option<Bytes> {
        let text = chunk.text();
        if text.is_empty() {
            return None;
        }
        let (id, created) = self.next_envelope(chrono::Utc::now().timestamp());
        let event = content_chunk(&id, created, &self.model, &text);
        Some(Bytes::from(sse_line(&event)))
    }

    fn tail(&mut self) -> Option<Bytes> {
        let (id, created) = self.next_envelope(chrono::Utc::now().timestamp());
        let event = stop_chunk(&id, created, &self.model);
        Some(Bytes::from(sse_line(&event)))
    }
}
