use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::Response,
};
use gateway_types::{GatewayError, Message};
use serde::Deserialize;
use tracing::{info, trace};

use super::common::{dispatch, into_http_error, wants_sse, ChatContext, ReplyShape, EMPTY_MESSAGE};
use crate::gateway::files::{FileUploader, PollPolicy};
use crate::gateway::ingest::{Attachment, AttachmentIngestor};
use crate::gateway::server::AppState;

const DEFAULT_ATTACHMENT_MIME: &str = "application/octet-stream";

#[derive(Debug, Default, Deserialize)]
pub struct ChatQuery {
    pub alt: Option<String>,
}

#[derive(Debug, Default)]
struct ChatForm {
    model: Option<String>,
    api_key: Option<String>,
    input: String,
    stream: bool,
    chat_id: Option<String>,
    attachments: Vec<Attachment>,
}

async fn read_form(multipart: &mut Multipart) -> Result<ChatForm, (StatusCode, String)> {
    let mut form = ChatForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        if let Some(file_name) = field.file_name().map(str::to_string) {
            let mime_type = field
                .content_type()
                .filter(|m| !m.is_empty())
                .unwrap_or(DEFAULT_ATTACHMENT_MIME)
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| (StatusCode::BAD_REQUEST, format!("Failed to read {}: {}", name, e)))?;

            // Browsers submit unselected file inputs as empty parts
            if file_name.is_empty() && data.is_empty() {
                continue;
            }
            form.attachments.push(Attachment { file_name, mime_type, data });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, format!("Failed to read {}: {}", name, e)))?;

        match name.as_str() {
            "model" => form.model = Some(value),
            "apikey" => form.api_key = Some(value),
            "input" => form.input = value,
            "stream" => form.stream = value == "true",
            "chatId" => form.chat_id = Some(value),
            _ => trace!("Ignoring unknown multipart field: {}", name),
        }
    }

    Ok(form)
}

/// Native chat endpoint: multipart form with `model`, `apikey`, `input`, `stream`,
/// optional `chatId` and any number of file fields.
pub async fn handle_chat(
    State(state): State<AppState>,
    Query(query): Query<ChatQuery>,
    mut multipart: Multipart,
) -> Result<Response, (StatusCode, String)> {
    let form = read_form(&mut multipart).await?;

    let ctx = ChatContext::new(
        form.model,
        form.api_key,
        form.chat_id,
        form.stream,
        wants_sse(query.alt.as_deref()),
    )
    .map_err(|e| into_http_error(e, ""))?;

    if form.input.trim().is_empty() && form.attachments.is_empty() {
        return Err(into_http_error(GatewayError::validation(EMPTY_MESSAGE), &ctx.api_key));
    }

    info!(
        "[Chat] {} | {} attachment(s) | stream={} sse={}",
        ctx.label(),
        form.attachments.len(),
        ctx.stream,
        ctx.sse
    );

    let uploader = FileUploader::new(
        state.files.as_ref(),
        state.sleeper.as_ref(),
        PollPolicy::from_config(&state.config),
    );
    let ingestor =
        AttachmentIngestor::new(uploader, state.fetcher.as_ref(), state.config.inline_limit_bytes);
    let parts = ingestor.ingest(&ctx.api_key, &form.input, form.attachments).await;

    dispatch(&state, &ctx, vec![Message::user(parts)], ReplyShape::Envelope)
        .await
        .map_err(|e| into_http_error(e, &ctx.api_key))
}
