use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
};
use gateway_types::{ContentPart, GatewayError, Message};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use super::common::{
    dispatch, into_http_error, wants_sse, ChatContext, ReplyShape, CHAT_ID_HEADER, EMPTY_MESSAGE,
};
use crate::gateway::server::AppState;

const GENERATE: &str = "generateContent";
const STREAM_GENERATE: &str = "streamGenerateContent";

#[derive(Debug, Default, Deserialize)]
pub struct GenerateQuery {
    pub key: Option<String>,
    pub alt: Option<String>,
}

/// Credential lookup in priority order: `key` query, `Authorization: Bearer`,
/// `x-api-key`, `x-goog-api-key`.
pub fn extract_api_key(query_key: Option<&str>, headers: &HeaderMap) -> Option<String> {
    let header_value =
        |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::trim);

    let bearer = header_value(header::AUTHORIZATION.as_str()).map(|v| {
        match v.get(..7) {
            Some(prefix) if prefix.eq_ignore_ascii_case("bearer ") => v[7..].trim_start(),
            _ => v,
        }
    });

    [query_key.map(str::trim), bearer, header_value("x-api-key"), header_value("x-goog-api-key")]
        .into_iter()
        .flatten()
        .find(|k| !k.is_empty())
        .map(str::to_string)
}

/// Parts of the last `contents` entry. Unsupported part kinds are skipped.
pub fn current_message_parts(body: &Value) -> Vec<ContentPart> {
    let raw_parts = body
        .get("contents")
        .and_then(Value::as_array)
        .and_then(|contents| contents.last())
        .and_then(|last| last.get("parts"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let total = raw_parts.len();
    let parts: Vec<ContentPart> = raw_parts.into_iter().filter_map(ContentPart::from_value).collect();
    if parts.len() < total {
        warn!("[Gemini] Skipped {} unsupported part(s) in request", total - parts.len());
    }
    parts
}

/// Google-compatible endpoint: `/v1beta/models/{model}:{generateContent|streamGenerateContent}`.
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(model_action): Path<String>,
    Query(query): Query<GenerateQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, (StatusCode, String)> {
    let (model, method) = model_action.rsplit_once(':').unwrap_or((model_action.as_str(), ""));

    let stream = match method {
        GENERATE => false,
        STREAM_GENERATE => true,
        _ => {
            return Err(into_http_error(
                GatewayError::NotFound { path: format!("/v1beta/models/{}", model_action) },
                "",
            ))
        },
    };

    info!("[Gemini] Request: {}/{}", model, method);

    let chat_id = headers
        .get(CHAT_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let ctx = ChatContext::new(
        Some(model.to_string()),
        extract_api_key(query.key.as_deref(), &headers),
        chat_id,
        stream,
        wants_sse(query.alt.as_deref()),
    )
    .map_err(|e| into_http_error(e, ""))?;

    let json: Value = serde_json::from_slice(&body).map_err(|e| {
        into_http_error(GatewayError::validation(format!("Invalid JSON body: {}", e)), &ctx.api_key)
    })?;

    let parts = current_message_parts(&json);
    if parts.is_empty() {
        return Err(into_http_error(GatewayError::validation(EMPTY_MESSAGE), &ctx.api_key));
    }

    dispatch(&state, &ctx, vec![Message::user(parts)], ReplyShape::Raw)
        .await
        .map_err(|e| into_http_error(e, &ctx.api_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_static(v));
        }
        map
    }

    #[test]
    fn test_api_key_priority() {
        let all = headers(&[
            ("authorization", "Bearer from-bearer"),
            ("x-api-key", "from-x-api-key"),
            ("x-goog-api-key", "from-goog"),
        ]);
        assert_eq!(extract_api_key(Some("from-query"), &all).as_deref(), Some("from-query"));
        assert_eq!(extract_api_key(None, &all).as_deref(), Some("from-bearer"));
        assert_eq!(
            extract_api_key(None, &headers(&[("x-goog-api-key", "from-goog")])).as_deref(),
            Some("from-goog")
        );
        assert_eq!(extract_api_key(Some(""), &HeaderMap::new()), None);
    }

    #[test]
    fn test_bearer_prefix_is_case_insensitive() {
        let h = headers(&[("authorization", "bearer   abc")]);
        assert_eq!(extract_api_key(None, &h).as_deref(), Some("abc"));
    }

    #[test]
    fn test_current_message_parts_uses_last_content() {
        let body = json!({
            "contents": [
                {"role": "user", "parts": [{"text": "old"}]},
                {"role": "user", "parts": [
                    {"text": "new"},
                    {"functionCall": {"name": "f"}},
                    {"inlineData": {"mimeType": "image/png", "data": "AAAA"}}
                ]}
            ]
        });

        assert_eq!(
            current_message_parts(&body),
            vec![ContentPart::text("new"), ContentPart::inline("image/png", "AAAA")]
        );
        assert!(current_message_parts(&json!({})).is_empty());
    }
}
