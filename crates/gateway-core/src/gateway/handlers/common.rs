//! Shared request pipeline for both inbound shapes.

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use gateway_types::{GatewayError, Message};
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::gateway::common::{mask_credential, redact_credential};
use crate::gateway::compose::compose;
use crate::gateway::provider::ProviderAdapter;
use crate::gateway::reframe::{reframe, FrameSink, NdjsonSink, SseSink};
use crate::gateway::server::AppState;

pub const MISSING_MODEL_OR_KEY: &str = "Missing model or API key in request";
pub const EMPTY_MESSAGE: &str = "Please enter a message or upload a file.";
pub const CHAT_ID_HEADER: &str = "x-chat-id";

/// Per-request context. Nothing here outlives the request.
#[derive(Debug, Clone)]
pub struct ChatContext {
    pub model: String,
    pub api_key: String,
    /// Caller-assigned conversation id, echoed back untouched.
    pub chat_id: Option<String>,
    pub stream: bool,
    pub sse: bool,
}

impl ChatContext {
    /// Both model and credential must be present and non-blank.
    pub fn new(
        model: Option<String>,
        api_key: Option<String>,
        chat_id: Option<String>,
        stream: bool,
        sse: bool,
    ) -> Result<Self, GatewayError> {
        let model = model.map(|m| m.trim().to_string()).filter(|m| !m.is_empty());
        let api_key = api_key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty());

        match (model, api_key) {
            (Some(model), Some(api_key)) => Ok(Self {
                model,
                api_key,
                chat_id: chat_id.filter(|c| !c.is_empty()),
                stream,
                sse,
            }),
            _ => Err(GatewayError::validation(MISSING_MODEL_OR_KEY)),
        }
    }

    pub fn label(&self) -> String {
        format!("{} (key {})", self.model, mask_credential(&self.api_key))
    }
}

/// Non-streaming body shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyShape {
    /// `{"response": [parts]}`
    Envelope,
    /// Provider JSON as received
    Raw,
}

/// `?alt=sse` selects the OpenAI-compatible event stream.
pub fn wants_sse(alt: Option<&str>) -> bool {
    alt.is_some_and(|a| a.eq_ignore_ascii_case("sse"))
}

/// Compose, call the provider and render the reply.
pub async fn dispatch(
    state: &AppState,
    ctx: &ChatContext,
    messages: Vec<Message>,
    shape: ReplyShape,
) -> Result<Response, GatewayError> {
    let request = compose(&state.config, &ctx.model, messages)?;
    let adapter = ProviderAdapter::new(state.provider.as_ref(), &ctx.api_key, &ctx.model);

    if ctx.stream {
        let chunks = adapter.stream(&request).await?;
        let sink: Box<dyn FrameSink> =
            if ctx.sse { Box::new(SseSink::new(&ctx.model)) } else { Box::new(NdjsonSink) };
        let content_type = sink.content_type();

        info!("[Chat] Streaming {} as {}", ctx.label(), content_type);
        let body = Body::from_stream(reframe(chunks, sink, &ctx.label()));

        let mut builder = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CACHE_CONTROL, "no-cache");
        if let Some(value) = chat_id_header(ctx) {
            builder = builder.header(CHAT_ID_HEADER, value);
        }
        return builder.body(body).map_err(|e| GatewayError::Internal {
            message: format!("Response build error: {}", e),
        });
    }

    let generated = adapter.generate(&request).await?;
    debug!("[Chat] {} returned {} part(s)", ctx.label(), generated.parts.len());

    let body = match shape {
        ReplyShape::Envelope => json!({ "response": generated.parts }),
        ReplyShape::Raw => generated.raw,
    };
    let mut response = Json(body).into_response();
    if let Some(value) = chat_id_header(ctx) {
        response.headers_mut().insert(CHAT_ID_HEADER, value);
    }
    Ok(response)
}

fn chat_id_header(ctx: &ChatContext) -> Option<HeaderValue> {
    ctx.chat_id.as_deref().and_then(|id| HeaderValue::from_str(id).ok())
}

/// Map a pipeline failure to the client-facing status and message.
///
/// Client errors keep their message. Everything else becomes a sanitized `500`.
pub fn into_http_error(err: GatewayError, api_key: &str) -> (StatusCode, String) {
    if err.is_client_error() {
        let status =
            StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::BAD_REQUEST);
        warn!("[Chat] Rejected request: {}", err);
        return (status, err.to_string());
    }

    let message = redact_credential(&err.to_string(), api_key);
    error!("[Chat] Request failed: {}", message);
    (StatusCode::INTERNAL_SERVER_ERROR, format!("Error processing chat message: {}", message))
}
