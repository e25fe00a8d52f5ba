//! In-memory fakes for the file lifecycle seams.

use async_trait::async_trait;
use bytes::Bytes;
use gateway_types::{AttachmentError, FileState, RemoteFileHandle};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::{FileStore, Sleeper};

pub(crate) fn handle(state: FileState) -> RemoteFileHandle {
    RemoteFileHandle {
        name: "files/abc".to_string(),
        uri: "https://files.example/files/abc".to_string(),
        mime_type: "video/mp4".to_string(),
        state,
        error: None,
    }
}

/// Returns a fixed upload handle and a scripted sequence of `get` results.
/// Once the script runs out, `get` keeps answering PROCESSING.
pub(crate) struct FakeFileStore {
    upload_result: Result<RemoteFileHandle, AttachmentError>,
    script: Mutex<VecDeque<Result<RemoteFileHandle, AttachmentError>>>,
    uploads: Mutex<Vec<(String, String, usize)>>,
    gets: AtomicUsize,
}

impl FakeFileStore {
    pub(crate) fn new(
        uploaded: RemoteFileHandle,
        script: Vec<Result<RemoteFileHandle, AttachmentError>>,
    ) -> Self {
        Self {
            upload_result: Ok(uploaded),
            script: Mutex::new(script.into()),
            uploads: Mutex::new(Vec::new()),
            gets: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing(error: AttachmentError) -> Self {
        Self {
            upload_result: Err(error),
            script: Mutex::new(VecDeque::new()),
            uploads: Mutex::new(Vec::new()),
            gets: AtomicUsize::new(0),
        }
    }

    /// `(display_name, mime_type, size)` per upload call, in call order.
    pub(crate) fn uploads(&self) -> Vec<(String, String, usize)> {
        self.uploads.lock().map(|u| u.clone()).unwrap_or_default()
    }

    pub(crate) fn get_calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FileStore for FakeFileStore {
    async fn upload(
        &self,
        _api_key: &str,
        data: Bytes,
        mime_type: &str,
        display_name: &str,
    ) -> Result<RemoteFileHandle, AttachmentError> {
        if let Ok(mut uploads) = self.uploads.lock() {
            uploads.push((display_name.to_string(), mime_type.to_string(), data.len()));
        }
        self.upload_result.clone().map(|mut h| {
            h.mime_type = mime_type.to_string();
            if !h.uri.is_empty() {
                h.uri = format!("{}/{}", h.uri, display_name);
            }
            h
        })
    }

    async fn get(&self, _api_key: &str, _name: &str) -> Result<RemoteFileHandle, AttachmentError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        next.unwrap_or_else(|| Ok(handle(FileState::Processing)))
    }
}

/// Records requested delays and returns immediately.
#[derive(Default)]
pub(crate) struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub(crate) fn count(&self) -> usize {
        self.delays.lock().map(|d| d.len()).unwrap_or_default()
    }

    pub(crate) fn total(&self) -> Duration {
        self.delays.lock().map(|d| d.iter().sum()).unwrap_or_default()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        if let Ok(mut delays) = self.delays.lock() {
            delays.push(duration);
        }
    }
}
