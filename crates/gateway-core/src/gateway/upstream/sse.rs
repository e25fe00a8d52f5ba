//! Decoder for the provider's `alt=sse` stream.
//!
//! Reassembles `data:` records split across transport packets. Nothing beyond one
//! incomplete line is buffered.

use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use gateway_types::GatewayError;
use std::fmt::Display;
use tracing::{debug, error};

use super::response::GenerateContentResponse;

/// Large inline images arrive as a single `data:` line.
const MAX_BUFFER_SIZE: usize = 50 * 1024 * 1024;

/// Parse a single SSE line into a `(field, value)` pair.
pub fn parse_sse_line(line: &str) -> Option<(&str, &str)> {
    let colon_pos = line.find(':')?;
    let field = &line[..colon_pos];
    let value = line[colon_pos + 1..].trim_start();
    Some((field, value))
}

fn decode_line(raw: &[u8]) -> Option<GenerateContentResponse> {
    let line = std::str::from_utf8(raw).ok()?.trim();
    if line.is_empty() {
        return None;
    }

    let (field, value) = parse_sse_line(line)?;
    if field != "data" || value.is_empty() || value == "[DONE]" {
        return None;
    }

    match serde_json::from_str::<GenerateContentResponse>(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            debug!("[Upstream-SSE] Skipping undecodable record: {}", e);
            None
        },
    }
}

/// Turn a raw byte stream into provider responses, one per `data:` record.
///
/// A transport error or an oversized record ends the stream with one `Err` item.
pub fn decode_sse_stream<S, E>(
    byte_stream: S,
) -> impl Stream<Item = Result<GenerateContentResponse, GatewayError>> + Send
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Display + Send,
{
    async_stream::stream! {
        let mut byte_stream = Box::pin(byte_stream);
        let mut buffer = BytesMut::new();

        loop {
            let bytes = match byte_stream.next().await {
                Some(Ok(b)) => b,
                Some(Err(e)) => {
                    error!("[Upstream-SSE] {}", e);
                    yield Err(GatewayError::stream(format!("Upstream stream interrupted: {}", e)));
                    return;
                },
                None => break,
            };

            buffer.extend_from_slice(&bytes);
            if buffer.len() > MAX_BUFFER_SIZE {
                error!("[Upstream-SSE] Buffer overflow, dropping connection");
                yield Err(GatewayError::stream("Upstream record exceeds buffer limit"));
                return;
            }

            while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                let line = buffer.split_to(pos + 1);
                if let Some(parsed) = decode_line(&line) {
                    yield Ok(parsed);
                }
            }
        }

        // Final record without a trailing newline
        if let Some(parsed) = decode_line(&buffer) {
            yield Ok(parsed);
        }
    }
}
