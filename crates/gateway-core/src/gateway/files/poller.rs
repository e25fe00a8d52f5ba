use gateway_types::{AttachmentError, FileState, RemoteFileHandle};
use tracing::{debug, info, warn};

use super::FileUploader;

impl FileUploader<'_> {
    /// Poll until the handle is ACTIVE.
    ///
    /// - already ACTIVE: returned without polling
    /// - FAILED at any poll: `FileProcessing`, no further polls
    /// - budget exhausted: `FileTimeout`
    /// - fetch errors are retried within the same budget; the last one is surfaced
    pub async fn await_active(
        &self,
        api_key: &str,
        handle: RemoteFileHandle,
    ) -> Result<RemoteFileHandle, AttachmentError> {
        match handle.state {
            FileState::Active => return Ok(handle),
            FileState::Failed => {
                return Err(AttachmentError::FileProcessing {
                    reason: handle.failure_reason(),
                    name: handle.name,
                })
            },
            FileState::Uploading | FileState::Processing => {},
        }

        let max_attempts = self.policy.max_attempts.max(1);
        let mut current = handle;

        for attempt in 1..=max_attempts {
            debug!("[Files] Polling state ({}/{}): {}", attempt, max_attempts, current.name);

            match self.store.get(api_key, &current.name).await {
                Ok(latest) => {
                    current = current.advance(latest);
                    match current.state {
                        FileState::Active => {
                            info!("[Files] {} is ACTIVE", current.name);
                            return Ok(current);
                        },
                        FileState::Failed => {
                            warn!(
                                "[Files] {} processing failed: {}",
                                current.name,
                                current.failure_reason()
                            );
                            return Err(AttachmentError::FileProcessing {
                                reason: current.failure_reason(),
                                name: current.name,
                            });
                        },
                        FileState::Uploading | FileState::Processing => {
                            debug!(
                                "[Files] {} is {}, retrying in {:?}",
                                current.name, current.state, self.policy.interval
                            );
                        },
                    }
                },
                Err(e) => {
                    if attempt == max_attempts {
                        return Err(e);
                    }
                    warn!("[Files] Poll {}/{} failed: {}", attempt, max_attempts, e);
                },
            }

            if attempt < max_attempts {
                self.sleeper.sleep(self.policy.interval).await;
            }
        }

        Err(AttachmentError::FileTimeout { name: current.name, attempts: max_attempts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::files::testing::{handle, FakeFileStore, RecordingSleeper};
    use crate::gateway::files::PollPolicy;
    use gateway_types::models::FileStatus;
    use std::time::Duration;

    fn policy(max_attempts: u32) -> PollPolicy {
        PollPolicy { max_attempts, interval: Duration::from_secs(5) }
    }

    fn lookup_error() -> AttachmentError {
        AttachmentError::FileLookup { name: "files/abc".into(), message: "connection reset".into() }
    }

    #[tokio::test]
    async fn test_active_handle_returns_without_polling() {
        let store = FakeFileStore::new(handle(FileState::Active), vec![]);
        let sleeper = RecordingSleeper::default();
        let uploader = FileUploader::new(&store, &sleeper, policy(10));

        let result = uploader.await_active("key", handle(FileState::Active)).await;

        assert!(result.is_ok());
        assert_eq!(store.get_calls(), 0);
        assert_eq!(sleeper.count(), 0);
    }

    #[tokio::test]
    async fn test_reaches_active_within_budget() {
        let store = FakeFileStore::new(
            handle(FileState::Processing),
            vec![
                Ok(handle(FileState::Processing)),
                Ok(handle(FileState::Processing)),
                Ok(handle(FileState::Active)),
            ],
        );
        let sleeper = RecordingSleeper::default();
        let uploader = FileUploader::new(&store, &sleeper, policy(10));

        let result = uploader
            .await_active("key", handle(FileState::Processing))
            .await
            .expect("should become active");

        assert!(result.is_active());
        assert_eq!(store.get_calls(), 3);
        assert_eq!(sleeper.count(), 2);
        assert_eq!(sleeper.total(), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_failed_stops_polling() {
        let mut failed = handle(FileState::Failed);
        failed.error = Some(FileStatus { message: "unsupported codec".into() });
        let store = FakeFileStore::new(
            handle(FileState::Processing),
            vec![Ok(handle(FileState::Processing)), Ok(failed), Ok(handle(FileState::Active))],
        );
        let sleeper = RecordingSleeper::default();
        let uploader = FileUploader::new(&store, &sleeper, policy(10));

        let err = uploader
            .await_active("key", handle(FileState::Processing))
            .await
            .expect_err("FAILED must surface");

        assert_eq!(
            err,
            AttachmentError::FileProcessing {
                name: "files/abc".into(),
                reason: "unsupported codec".into()
            }
        );
        assert_eq!(store.get_calls(), 2);
    }

    #[tokio::test]
    async fn test_budget_exhausted_is_timeout() {
        let store = FakeFileStore::new(
            handle(FileState::Processing),
            vec![
                Ok(handle(FileState::Processing)),
                Ok(handle(FileState::Processing)),
                Ok(handle(FileState::Processing)),
            ],
        );
        let sleeper = RecordingSleeper::default();
        let uploader = FileUploader::new(&store, &sleeper, policy(3));

        let err = uploader
            .await_active("key", handle(FileState::Uploading))
            .await
            .expect_err("should time out");

        assert_eq!(err, AttachmentError::FileTimeout { name: "files/abc".into(), attempts: 3 });
        assert_eq!(store.get_calls(), 3);
        assert_eq!(sleeper.count(), 2);
    }

    #[tokio::test]
    async fn test_transient_fetch_error_is_retried() {
        let store = FakeFileStore::new(
            handle(FileState::Processing),
            vec![Err(lookup_error()), Ok(handle(FileState::Active))],
        );
        let sleeper = RecordingSleeper::default();
        let uploader = FileUploader::new(&store, &sleeper, policy(5));

        let result = uploader.await_active("key", handle(FileState::Processing)).await;

        assert!(result.is_ok());
        assert_eq!(store.get_calls(), 2);
    }

    #[tokio::test]
    async fn test_fetch_error_on_final_attempt_is_surfaced() {
        let store = FakeFileStore::new(
            handle(FileState::Processing),
            vec![Ok(handle(FileState::Processing)), Err(lookup_error())],
        );
        let sleeper = RecordingSleeper::default();
        let uploader = FileUploader::new(&store, &sleeper, policy(2));

        let err = uploader
            .await_active("key", handle(FileState::Processing))
            .await
            .expect_err("last error surfaces");

        assert_eq!(err, lookup_error());
    }
}
