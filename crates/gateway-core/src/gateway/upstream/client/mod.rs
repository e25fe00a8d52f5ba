mod request_executor;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use gateway_types::{AttachmentError, GatewayConfig, GatewayError, RemoteFileHandle};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

use crate::gateway::common::redact_credential;
use crate::gateway::compose::GenerateRequest;
use crate::gateway::files::FileStore;
use crate::gateway::provider::{GenerativeProvider, ProviderStream};
use crate::gateway::upstream::sse::decode_sse_stream;

pub use request_executor::{build_headers, build_url, API_KEY_HEADER};

const USER_AGENT: &str = concat!("gemini-gateway/", env!("CARGO_PKG_VERSION"));
const UPLOAD_URL_HEADER: &str = "x-goog-upload-url";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: RemoteFileHandle,
}

/// HTTP client for the Gemini generative-language API.
///
/// Stateless across requests: the caller's key is passed per call.
#[derive(Clone)]
pub struct UpstreamClient {
    http_client: Client,
    base_url: String,
    api_version: String,
    request_timeout: Option<Duration>,
}

impl UpstreamClient {
    /// Accepts a pre-built `reqwest::Client` so tests can point it anywhere.
    pub fn new(http_client: Client, base_url: &str, api_version: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_version: api_version.trim_matches('/').to_string(),
            request_timeout: None,
        }
    }

    /// Total deadline for unary calls (generate, upload, file lookup).
    /// Streams are only bounded by the client's read timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let request_timeout = Duration::from_secs(config.request_timeout_secs);
        // Idle gap between reads; a long stream that keeps producing is never cut.
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(20))
            .read_timeout(request_timeout)
            .build()
            .map_err(|e| GatewayError::Internal { message: format!("HTTP client: {}", e) })?;

        info!("[Upstream] Provider endpoint {}/{}", config.upstream_base_url, config.api_version);
        Ok(Self::new(http_client, &config.upstream_base_url, &config.api_version)
            .with_request_timeout(request_timeout))
    }

    /// Shared connection pool, reused by the media fetcher.
    pub fn http_client(&self) -> &Client {
        &self.http_client
    }

    fn model_url(
        &self,
        model: &str,
        method: &str,
        query_string: Option<&str>,
    ) -> Result<String, GatewayError> {
        build_url(&self.base_url, &self.api_version, model, method, query_string)
    }

    fn with_deadline(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.request_timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    async fn start_resumable_upload(
        &self,
        api_key: &str,
        size: usize,
        mime_type: &str,
        display_name: &str,
    ) -> Result<String, AttachmentError> {
        let url = format!("{}/upload/{}/files", self.base_url, self.api_version);
        let headers = build_headers(api_key).map_err(AttachmentError::upload)?;

        let response = self
            .with_deadline(self.http_client.post(&url))
            .headers(headers)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", size.to_string())
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .json(&json!({ "file": { "display_name": display_name } }))
            .send()
            .await
            .map_err(|e| AttachmentError::upload(redact_credential(&e.to_string(), api_key)))?;

        if !response.status().is_success() {
            return Err(AttachmentError::upload(
                request_executor::error_message(response, api_key).await,
            ));
        }

        response
            .headers()
            .get(UPLOAD_URL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| AttachmentError::upload("Provider did not return an upload URL"))
    }
}

#[async_trait]
impl FileStore for UpstreamClient {
    async fn upload(
        &self,
        api_key: &str,
        data: Bytes,
        mime_type: &str,
        display_name: &str,
    ) -> Result<RemoteFileHandle, AttachmentError> {
        let upload_url =
            self.start_resumable_upload(api_key, data.len(), mime_type, display_name).await?;
        debug!("[Upstream] Upload session opened for {}", display_name);

        let response = self
            .with_deadline(self.http_client.post(&upload_url))
            .header("X-Goog-Upload-Command", "upload, finalize")
            .header("X-Goog-Upload-Offset", "0")
            .body(data)
            .send()
            .await
            .map_err(|e| AttachmentError::upload(redact_credential(&e.to_string(), api_key)))?;

        if !response.status().is_success() {
            return Err(AttachmentError::upload(
                request_executor::error_message(response, api_key).await,
            ));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| AttachmentError::upload(format!("Malformed upload response: {}", e)))?;
        Ok(uploaded.file)
    }

    async fn get(&self, api_key: &str, name: &str) -> Result<RemoteFileHandle, AttachmentError> {
        let url = format!("{}/{}/{}", self.base_url, self.api_version, name);
        let lookup_error =
            |message: String| AttachmentError::FileLookup { name: name.to_string(), message };
        let headers = build_headers(api_key).map_err(lookup_error)?;

        let response = self
            .with_deadline(self.http_client.get(&url))
            .headers(headers)
            .send()
            .await
            .map_err(|e| lookup_error(redact_credential(&e.to_string(), api_key)))?;

        if !response.status().is_success() {
            return Err(lookup_error(request_executor::error_message(response, api_key).await));
        }

        response
            .json::<RemoteFileHandle>()
            .await
            .map_err(|e| lookup_error(format!("Malformed file resource: {}", e)))
    }
}

#[async_trait]
impl GenerativeProvider for UpstreamClient {
    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<Value, GatewayError> {
        let url = self.model_url(model, "generateContent", None)?;
        let response = request_executor::execute_json(
            &self.http_client,
            &url,
            api_key,
            request,
            self.request_timeout,
        )
        .await?;

        response
            .json::<Value>()
            .await
            .map_err(|e| GatewayError::provider(format!("Malformed provider response: {}", e)))
    }

    async fn generate_stream(
        &self,
        api_key: &str,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<ProviderStream, GatewayError> {
        let url = self.model_url(model, "streamGenerateContent", Some("alt=sse"))?;
        let response =
            request_executor::execute_json(&self.http_client, &url, api_key, request, None).await?;

        Ok(decode_sse_stream(response.bytes_stream()).boxed())
    }
}
