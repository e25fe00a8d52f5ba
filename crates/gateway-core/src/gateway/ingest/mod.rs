//! Attachment ingestion: turns raw message text, embedded media URLs and uploaded blobs into
//! an ordered list of content parts.
//!
//! Per item the ingestor decides between inline base64 encoding and a hand-off to the
//! [`FileUploader`]. A failure on one item never aborts the message: the item is replaced
//! by a text part describing the failure.
//!
//! Output order: attachments in submission order, then URL-derived parts in order of
//! appearance, then the remaining text.

pub mod url_media;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bytes::Bytes;
use futures::future::join_all;
use gateway_types::{AttachmentError, ContentPart};
use tracing::{debug, info, warn};

use crate::gateway::common::truncate_chars;
use crate::gateway::files::FileUploader;
use url_media::{display_name_from_url, extract_media_urls, strip_urls};

const MAX_FAILURE_DETAIL_CHARS: usize = 200;

/// A binary attachment submitted with the message.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub data: Bytes,
}

/// Downloaded media resource.
#[derive(Debug, Clone)]
pub struct FetchedMedia {
    pub data: Bytes,
    pub mime_type: String,
}

/// Downloads media referenced by URL inside message text.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedMedia, AttachmentError>;
}

/// Streaming media always goes to the file store; everything else only when too large.
pub fn requires_remote_upload(mime_type: &str, size: u64, inline_limit: u64) -> bool {
    mime_type.starts_with("audio/") || mime_type.starts_with("video/") || size >= inline_limit
}

pub struct AttachmentIngestor<'a> {
    uploader: FileUploader<'a>,
    fetcher: &'a dyn MediaFetcher,
    inline_limit: u64,
}

impl<'a> AttachmentIngestor<'a> {
    pub fn new(uploader: FileUploader<'a>, fetcher: &'a dyn MediaFetcher, inline_limit: u64) -> Self {
        Self { uploader, fetcher, inline_limit }
    }

    /// Normalize one message. Returns zero parts when both text and attachments are empty;
    /// callers reject such requests before getting here.
    pub async fn ingest(
        &self,
        api_key: &str,
        input_text: &str,
        attachments: Vec<Attachment>,
    ) -> Vec<ContentPart> {
        let urls = extract_media_urls(input_text);
        let remaining_text = strip_urls(input_text, &urls);

        debug!(
            "[Ingest] {} attachment(s), {} media URL(s), {} text chars",
            attachments.len(),
            urls.len(),
            remaining_text.chars().count()
        );

        // Uploads run concurrently; join_all keeps submission order.
        let mut parts =
            join_all(attachments.into_iter().map(|a| self.ingest_attachment(api_key, a))).await;
        parts.extend(join_all(urls.iter().map(|url| self.ingest_url(api_key, url))).await);

        if !remaining_text.is_empty() {
            parts.push(ContentPart::text(remaining_text));
        }
        parts
    }

    async fn ingest_attachment(&self, api_key: &str, attachment: Attachment) -> ContentPart {
        let Attachment { file_name, mime_type, data } = attachment;

        match self.encode_or_upload(api_key, data, &mime_type, &file_name).await {
            Ok(part) => part,
            Err(e) => {
                warn!("[Ingest] Attachment {} failed: {}", file_name, e);
                let detail = truncate_chars(&e.to_string(), MAX_FAILURE_DETAIL_CHARS);
                ContentPart::text(format!("[File processing failed: {} - {}]", file_name, detail))
            },
        }
    }

    async fn ingest_url(&self, api_key: &str, url: &str) -> ContentPart {
        let result = match self.fetcher.fetch(url).await {
            Ok(media) => {
                let display_name = display_name_from_url(url)
                    .unwrap_or_else(|| format!("downloaded_{}", uuid::Uuid::new_v4().simple()));
                self.encode_or_upload(api_key, media.data, &media.mime_type, &display_name).await
            },
            Err(e) => Err(e),
        };

        result.unwrap_or_else(|e| {
            warn!("[Ingest] Media URL {} failed: {}", url, e);
            ContentPart::text(format!(
                "[Image URL {} processing failed: {}]",
                url,
                truncate_chars(&e.to_string(), MAX_FAILURE_DETAIL_CHARS)
            ))
        })
    }

    async fn encode_or_upload(
        &self,
        api_key: &str,
        data: Bytes,
        mime_type: &str,
        display_name: &str,
    ) -> Result<ContentPart, AttachmentError> {
        let size = data.len() as u64;
        if requires_remote_upload(mime_type, size, self.inline_limit) {
            info!("[Ingest] {} ({} bytes, {}) -> file store", display_name, size, mime_type);
            return self.uploader.upload_as_part(api_key, data, mime_type, display_name).await;
        }

        debug!("[Ingest] {} ({} bytes, {}) -> inline", display_name, size, mime_type);
        Ok(ContentPart::inline(mime_type, STANDARD.encode(&data)))
    }
}
