use bytes::Bytes;
use gateway_types::{AttachmentError, ContentPart, RemoteFileHandle};
use tracing::{debug, info};

use super::{FileStore, PollPolicy, Sleeper};

/// Drives one attachment through upload and activation.
///
/// Borrowed per request; owns no state across requests.
pub struct FileUploader<'a> {
    pub(super) store: &'a dyn FileStore,
    pub(super) sleeper: &'a dyn Sleeper,
    pub(super) policy: PollPolicy,
}

impl<'a> FileUploader<'a> {
    pub fn new(store: &'a dyn FileStore, sleeper: &'a dyn Sleeper, policy: PollPolicy) -> Self {
        Self { store, sleeper, policy }
    }

    /// Submit the asset and check the provider accepted it.
    pub async fn upload(
        &self,
        api_key: &str,
        data: Bytes,
        mime_type: &str,
        display_name: &str,
    ) -> Result<RemoteFileHandle, AttachmentError> {
        let size = data.len();
        let handle = self.store.upload(api_key, data, mime_type, display_name).await?;

        if handle.name.is_empty() || handle.uri.is_empty() {
            return Err(AttachmentError::upload(format!(
                "File {} returned no metadata after upload",
                display_name
            )));
        }

        info!(
            "[Files] Uploaded {} ({} bytes, {}) as {} [{}]",
            display_name, size, mime_type, handle.name, handle.state
        );
        Ok(handle)
    }

    /// Upload, wait for ACTIVE and produce the file reference part.
    pub async fn upload_as_part(
        &self,
        api_key: &str,
        data: Bytes,
        mime_type: &str,
        display_name: &str,
    ) -> Result<ContentPart, AttachmentError> {
        let handle = self.upload(api_key, data, mime_type, display_name).await?;
        let active = self.await_active(api_key, handle).await?;

        let part_mime =
            if active.mime_type.is_empty() { mime_type.to_string() } else { active.mime_type };
        debug!("[Files] {} ready at {}", active.name, active.uri);
        Ok(ContentPart::file(part_mime, active.uri))
    }
}
