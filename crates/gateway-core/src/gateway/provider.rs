//! Provider Stream Adapter.
//!
//! [`GenerativeProvider`] is the raw generation seam (implemented by the upstream client).
//! [`ProviderAdapter`] wraps one call and normalizes the provider's chunks into
//! [`StreamChunk`]s the re-framer consumes.

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use gateway_types::{ContentPart, GatewayError, StreamChunk};
use serde_json::Value;
use tracing::{debug, warn};

use crate::gateway::common::redact_credential;
use crate::gateway::compose::GenerateRequest;
use crate::gateway::upstream::GenerateContentResponse;

pub type ProviderStream = BoxStream<'static, Result<GenerateContentResponse, GatewayError>>;
pub type ChunkStream = BoxStream<'static, Result<StreamChunk, GatewayError>>;

#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Single-shot generation. Returns the provider's JSON body untouched.
    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<Value, GatewayError>;

    /// Streaming generation. Fails early if the provider rejects the call.
    async fn generate_stream(
        &self,
        api_key: &str,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<ProviderStream, GatewayError>;
}

/// Result of a non-streaming call: the raw body and its extracted parts.
#[derive(Debug, Clone)]
pub struct Generated {
    pub raw: Value,
    pub parts: Vec<ContentPart>,
}

/// Convert one provider chunk. `None` means the chunk carries nothing the caller can use.
pub fn chunk_from_response(model: &str, response: &GenerateContentResponse) -> Option<StreamChunk> {
    if let Some(reason) = response.block_reason() {
        warn!("[Stream] {} prompt feedback: blocked ({})", model, reason);
    }

    let unknown = response.unrecognized_part_count();
    if unknown > 0 {
        warn!("[Stream] {} skipped {} unsupported part(s)", model, unknown);
    }

    let finish_reason = response.finish_reason().map(str::to_string);
    if let Some(reason) = &finish_reason {
        debug!("[Stream] {} finish reason: {}", model, reason);
    }

    let mut parts = response.parts();
    if parts.is_empty() {
        if let Some(text) = response.text() {
            parts.push(ContentPart::text(text));
        }
    }

    if parts.is_empty() && finish_reason.is_none() {
        debug!("[Stream] {} chunk without content or signal, skipped", model);
        return None;
    }

    Some(StreamChunk { parts, finish_reason })
}

/// Wraps a single provider call for one request.
pub struct ProviderAdapter<'a> {
    provider: &'a dyn GenerativeProvider,
    api_key: &'a str,
    model: &'a str,
}

impl<'a> ProviderAdapter<'a> {
    pub fn new(provider: &'a dyn GenerativeProvider, api_key: &'a str, model: &'a str) -> Self {
        Self { provider, api_key, model }
    }

    fn redact(&self, err: GatewayError) -> GatewayError {
        match err {
            GatewayError::Provider { message } => {
                GatewayError::provider(redact_credential(&message, self.api_key))
            },
            GatewayError::StreamTransport { message } => {
                GatewayError::stream(redact_credential(&message, self.api_key))
            },
            other => other,
        }
    }

    /// Non-streaming call. Fails with `EmptyResponse` when the first candidate has no parts.
    pub async fn generate(&self, request: &GenerateRequest) -> Result<Generated, GatewayError> {
        let raw = self
            .provider
            .generate(self.api_key, self.model, request)
            .await
            .map_err(|e| self.redact(e))?;

        let parsed: GenerateContentResponse = serde_json::from_value(raw.clone())
            .map_err(|e| GatewayError::provider(format!("Malformed provider response: {}", e)))?;

        let parts = parsed.parts();
        if parts.is_empty() {
            let block_reason = parsed.block_reason().map(str::to_string);
            warn!("[Gemini] {} returned no content (block reason: {:?})", self.model, block_reason);
            return Err(GatewayError::EmptyResponse { block_reason });
        }

        Ok(Generated { raw, parts })
    }

    /// Streaming call. Chunks that carry neither parts nor a finish signal are dropped.
    pub async fn stream(&self, request: &GenerateRequest) -> Result<ChunkStream, GatewayError> {
        let upstream = self
            .provider
            .generate_stream(self.api_key, self.model, request)
            .await
            .map_err(|e| self.redact(e))?;

        let model = self.model.to_string();
        let api_key = self.api_key.to_string();

        let chunks = upstream.filter_map(move |item| {
            let out = match item {
                Ok(response) => chunk_from_response(&model, &response).map(Ok),
                Err(GatewayError::StreamTransport { message }) => {
                    Some(Err(GatewayError::stream(redact_credential(&message, &api_key))))
                },
                Err(e) => Some(Err(e)),
            };
            futures::future::ready(out)
        });

        Ok(chunks.boxed())
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::testing::{finish_chunk, text_chunk, FakeProvider};
    use super::*;
    use gateway_types::Message;
    use serde_json::json;

    fn request() -> GenerateRequest {
        GenerateRequest {
            contents: vec![Message::user(vec![ContentPart::text("hello")])],
            generation_config: None,
        }
    }

    #[tokio::test]
    async fn test_generate_extracts_parts_and_keeps_raw() {
        let body = json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": "hi there"}]}}],
            "modelVersion": "gemini-x"
        });
        let provider = FakeProvider::replying(body.clone());
        let adapter = ProviderAdapter::new(&provider, "key", "gemini-x");

        let generated = adapter.generate(&request()).await.unwrap();
        assert_eq!(generated.parts, vec![ContentPart::text("hi there")]);
        assert_eq!(generated.raw, body);
        assert_eq!(provider.requests()[0].0, "gemini-x");
    }

    #[tokio::test]
    async fn test_generate_without_candidates_surfaces_block_reason() {
        let provider = FakeProvider::replying(json!({"promptFeedback": {"blockReason": "SAFETY"}}));
        let adapter = ProviderAdapter::new(&provider, "key", "gemini-x");

        let err = adapter.generate(&request()).await.unwrap_err();
        assert_eq!(err, GatewayError::EmptyResponse { block_reason: Some("SAFETY".into()) });
    }

    #[tokio::test]
    async fn test_provider_error_is_redacted() {
        let provider = FakeProvider::failing(GatewayError::provider("bad key AIzaSecret"));
        let adapter = ProviderAdapter::new(&provider, "AIzaSecret", "gemini-x");

        let err = adapter.generate(&request()).await.unwrap_err();
        assert_eq!(err, GatewayError::provider("bad key ***"));
    }

    #[tokio::test]
    async fn test_stream_normalizes_and_skips_empty_chunks() {
        let provider = FakeProvider::streaming(vec![
            Ok(text_chunk("Hel")),
            Ok(json!({"candidates": []})),
            Ok(text_chunk("lo")),
            Ok(finish_chunk()),
        ]);
        let adapter = ProviderAdapter::new(&provider, "key", "gemini-x");

        let chunks: Vec<StreamChunk> = adapter
            .stream(&request())
            .await
            .unwrap()
            .map(|c| c.unwrap())
            .collect()
            .await;

        assert_eq!(
            chunks,
            vec![
                StreamChunk::new(vec![ContentPart::text("Hel")]),
                StreamChunk::new(vec![ContentPart::text("lo")]),
                StreamChunk::finished("STOP"),
            ]
        );
    }

    #[test]
    fn test_chunk_falls_back_to_text_view() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({"text": "t"})).unwrap();

        let chunk = chunk_from_response("m", &response).unwrap();
        assert_eq!(chunk.parts, vec![ContentPart::text("t")]);
    }

    #[test]
    fn test_chunk_with_prompt_feedback_only_is_skipped() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "OTHER"}})).unwrap();
        assert!(chunk_from_response("m", &response).is_none());
    }
}
