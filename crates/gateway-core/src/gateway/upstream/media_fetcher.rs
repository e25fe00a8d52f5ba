use async_trait::async_trait;
use gateway_types::AttachmentError;
use reqwest::{header, Client};
use tracing::debug;

use crate::gateway::ingest::{FetchedMedia, MediaFetcher};

/// Downloads image URLs found in message text.
///
/// Only `2xx` responses with an `image/*` content type are accepted.
#[derive(Clone)]
pub struct HttpMediaFetcher {
    http_client: Client,
}

impl HttpMediaFetcher {
    pub fn new(http_client: Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl MediaFetcher for HttpMediaFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedMedia, AttachmentError> {
        let fetch_error =
            |message: String| AttachmentError::Fetch { url: url.to_string(), message };

        let response =
            self.http_client.get(url).send().await.map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {}", status.as_u16())));
        }

        let mime_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .unwrap_or_default();
        if !mime_type.starts_with("image/") {
            return Err(fetch_error(format!(
                "Not a valid image type: {}",
                if mime_type.is_empty() { "unknown" } else { &mime_type }
            )));
        }

        let data = response.bytes().await.map_err(|e| fetch_error(e.to_string()))?;
        debug!("[Ingest] Fetched {} ({} bytes, {})", url, data.len(), mime_type);
        Ok(FetchedMedia { data, mime_type })
    }
}
