// OpenAI-compatible chat-completion-chunk envelopes
use serde_json::{json, Value};

/// Format an SSE data event
#[inline]
pub fn sse_line(data: &Value) -> String {
    format!("data: {}\n\n", serde_json::to_string(data).unwrap_or_default())
}

/// Create a content delta chunk
pub fn content_chunk(stream_id: &str, created_ts: i64, model: &str, content: &str) -> Value {
    json!({
        "id": stream_id,
        "object": "chat.completion.chunk",
        "created": created_ts,
        "model": model,
        "choices": [{
            "index": 0,
            "delta": { "role": "assistant", "content": content },
            "finish_reason": Value::Null
        }]
    })
}

/// Create the terminal chunk: empty delta, `finish_reason: "stop"`
pub fn stop_chunk(stream_id: &str, created_ts: i64, model: &str) -> Value {
    json!({
        "id": stream_id,
        "object": "chat.completion.chunk",
        "created": created_ts,
        "model": model,
        "choices": [{
            "index": 0,
            "delta": {},
            "finish_reason": "stop"
        }]
    })
}
