use gateway_types::GatewayError;
use reqwest::{header, Client, Response};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::gateway::common::{redact_credential, sanitize_upstream_error};

pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// `{base}/{version}/models/{model}:{method}[?query]`
///
/// The model is caller input and is percent-encoded as a single path segment.
pub fn build_url(
    base_url: &str,
    api_version: &str,
    model: &str,
    method: &str,
    query_string: Option<&str>,
) -> Result<String, GatewayError> {
    let model = model.trim_start_matches("models/");
    let mut url = Url::parse(base_url).map_err(|e| GatewayError::Internal {
        message: format!("Invalid upstream base URL {}: {}", base_url, e),
    })?;

    url.path_segments_mut()
        .map_err(|()| GatewayError::Internal {
            message: format!("Upstream base URL {} cannot carry a path", base_url),
        })?
        .pop_if_empty()
        .extend(api_version.split('/').filter(|s| !s.is_empty()))
        .push("models")
        .push(&format!("{}:{}", model, method));
    url.set_query(query_string);
    Ok(url.into())
}

/// JSON headers authenticated with the caller's key. The key travels in a header so it
/// never appears in URLs or transport error messages.
pub fn build_headers(api_key: &str) -> Result<header::HeaderMap, String> {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, header::HeaderValue::from_static("application/json"));
    let mut key = header::HeaderValue::from_str(api_key).map_err(|e| e.to_string())?;
    key.set_sensitive(true);
    headers.insert(API_KEY_HEADER, key);
    Ok(headers)
}

/// Map a non-success response to a sanitized, credential-free message.
pub async fn error_message(response: Response, api_key: &str) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    warn!("[Upstream] HTTP {} from provider ({} bytes)", status.as_u16(), body.len());
    redact_credential(&sanitize_upstream_error(status.as_u16(), &body), api_key)
}

/// POST a JSON body and return the response if the provider accepted it.
///
/// `timeout` bounds the whole exchange, body included, so streaming calls pass `None`.
pub async fn execute_json<B: Serialize + ?Sized>(
    client: &Client,
    url: &str,
    api_key: &str,
    body: &B,
    timeout: Option<Duration>,
) -> Result<Response, GatewayError> {
    let headers = build_headers(api_key).map_err(|_| GatewayError::validation("Invalid API key format"))?;

    debug!("[Upstream] POST {}", url);
    let mut request = client.post(url).headers(headers).json(body);
    if let Some(timeout) = timeout {
        request = request.timeout(timeout);
    }
    let response = request
        .send()
        .await
        .map_err(|e| {
            GatewayError::provider(redact_credential(&format!("Request failed: {}", e), api_key))
        })?;

    if !response.status().is_success() {
        return Err(GatewayError::provider(error_message(response, api_key).await));
    }
    Ok(response)
}
