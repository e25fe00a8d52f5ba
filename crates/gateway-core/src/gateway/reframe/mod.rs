//! Response Re-framer.
//!
//! Single-producer, single-consumer loop from provider chunks to outbound frames:
//!
//! ```text
//! STREAMING ──(end of stream)──► FLUSH_TAIL ──► CLOSED
//!     │
//!     └──────(upstream error)──────────────────► CLOSED   (no tail, body aborted)
//! ```
//!
//! The next chunk is only read after the previous frame was taken by the transport.
//! Dropping the returned stream (caller disconnect) drops the provider stream with it.

mod formatters;
mod sinks;

pub use sinks::{FrameSink, NdjsonSink, SseSink, NDJSON_CONTENT_TYPE, SSE_CONTENT_TYPE};

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use gateway_types::GatewayError;
use tracing::{debug, error};

use crate::gateway::provider::ChunkStream;

pub type FrameStream = BoxStream<'static, Result<Bytes, GatewayError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReframeState {
    Streaming,
    FlushTail,
    Closed,
}

/// Reports a caller abort when the outbound body is dropped before the loop closed.
struct AbortWatch {
    label: String,
    frames: usize,
    closed: bool,
}

impl AbortWatch {
    fn abort_error(&self) -> Option<GatewayError> {
        (!self.closed).then_some(GatewayError::AbortedByCaller)
    }
}

impl Drop for AbortWatch {
    fn drop(&mut self) {
        if let Some(e) = self.abort_error() {
            log_termination(&self.label, self.frames, &e);
        }
    }
}

/// Caller aborts stay at debug; every other termination is an error.
fn log_termination(label: &str, frames: usize, e: &GatewayError) {
    if e.is_caller_abort() {
        debug!("[Stream] {} {} after {} frame(s), provider stream released", label, e, frames);
    } else {
        error!("[Stream] {} upstream failed after {} frame(s): {}", label, frames, e);
    }
}

/// Drive `chunks` through `sink`.
pub fn reframe(mut chunks: ChunkStream, mut sink: Box<dyn FrameSink>, label: &str) -> FrameStream {
    let label = label.to_string();

    let stream = async_stream::stream! {
        let mut watch = AbortWatch { label, frames: 0, closed: false };
        let mut state = ReframeState::Streaming;

        while state != ReframeState::Closed {
            match state {
                ReframeState::Streaming => match chunks.next().await {
                    Some(Ok(chunk)) => {
                        if let Some(frame) = sink.frame(&chunk) {
                            watch.frames += 1;
                            yield Ok(frame);
                        }
                    },
                    Some(Err(e)) => {
                        log_termination(&watch.label, watch.frames, &e);
                        state = ReframeState::Closed;
                        yield Err(e);
                    },
                    None => state = ReframeState::FlushTail,
                },
                ReframeState::FlushTail => {
                    state = ReframeState::Closed;
                    if let Some(tail) = sink.tail() {
                        watch.frames += 1;
                        yield Ok(tail);
                    }
                },
                ReframeState::Closed => {},
            }
        }

        watch.closed = true;
        debug!("[Stream] {} completed with {} frame(s)", watch.label, watch.frames);
    };

    stream.boxed()
}
