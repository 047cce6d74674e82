//! Single-image fetch with bounded retry.
//!
//! A [`FetchWorker`] handles one [`DownloadTask`] from start to finish:
//! existing-output short-circuit, HTTP GET with timeouts, retry of transient
//! failures with a fixed backoff, decode, and atomic persist.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::client::HttpClient;
use super::error::DownloadError;
use super::persist::{PersistedImage, decode_and_persist};
use super::retry::{RetryDecision, RetryPolicy, classify_error};
use super::task::DownloadTask;
use crate::decode::{DecodeSource, Decoder};

/// Terminal result of one task.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The destination already existed; no request was made.
    Skipped {
        /// The existing output file.
        path: PathBuf,
    },
    /// The image was fetched, converted and written.
    Success {
        /// The written output file.
        path: PathBuf,
        /// Size of the written PNG.
        bytes: u64,
        /// Content-Length the server advertised, if any.
        content_length: Option<u64>,
        /// Attempts used, including the successful one.
        attempts: u32,
        /// Codec that decoded the payload.
        source: DecodeSource,
    },
    /// The task ended without an output file.
    Failed {
        /// The last error observed.
        error: DownloadError,
        /// Attempts used.
        attempts: u32,
    },
}

impl FetchOutcome {
    /// Number of HTTP attempts made; zero for skipped tasks.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Skipped { .. } => 0,
            Self::Success { attempts, .. } | Self::Failed { attempts, .. } => *attempts,
        }
    }

    /// Returns true for [`FetchOutcome::Skipped`].
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    /// Returns true for [`FetchOutcome::Success`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns true for [`FetchOutcome::Failed`].
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Fetches, converts and persists single images.
///
/// Cheap to clone; the HTTP client pools connections across clones.
#[derive(Debug, Clone)]
pub struct FetchWorker {
    client: HttpClient,
    decoder: Arc<Decoder>,
    retry_policy: RetryPolicy,
}

impl FetchWorker {
    /// Creates a worker from its collaborators.
    #[must_use]
    pub fn new(client: HttpClient, decoder: Decoder, retry_policy: RetryPolicy) -> Self {
        Self {
            client,
            decoder: Arc::new(decoder),
            retry_policy,
        }
    }

    /// The retry policy this worker applies.
    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// The decoder this worker hands payloads to.
    #[must_use]
    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// Runs one task to a terminal outcome.
    ///
    /// Never returns an error: every failure is captured in
    /// [`FetchOutcome::Failed`] so sibling tasks are unaffected.
    #[instrument(skip(self, task), fields(identifier = %task.identifier(), url = %task.url()))]
    pub async fn fetch(&self, task: &DownloadTask) -> FetchOutcome {
        let destination = task.destination();
        if destination.exists() {
            info!(path = %destination.display(), "Skipping existing img");
            return FetchOutcome::Skipped {
                path: destination.to_path_buf(),
            };
        }

        let mut attempt = 0u32;

        loop {
            attempt += 1;
            debug!(attempt, "attempting fetch");

            let error = match self.attempt_once(task).await {
                Ok((persisted, content_length)) => {
                    info!(
                        path = %destination.display(),
                        attempt,
                        bytes = persisted.bytes_written,
                        width = persisted.width,
                        height = persisted.height,
                        "Downloaded and converted"
                    );
                    return FetchOutcome::Success {
                        path: destination.to_path_buf(),
                        bytes: persisted.bytes_written,
                        content_length,
                        attempts: attempt,
                        source: persisted.source,
                    };
                }
                Err(e) => e,
            };

            match self.retry_policy.should_retry(classify_error(&error), attempt) {
                RetryDecision::Retry {
                    delay,
                    attempt: next_attempt,
                } => {
                    info!(
                        attempt = next_attempt,
                        max_attempts = self.retry_policy.max_attempts(),
                        delay_ms = delay.as_millis(),
                        error = %error,
                        "retrying download"
                    );
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::DoNotRetry { reason } => {
                    warn!(attempt, %reason, error = %error, "download failed");
                    return FetchOutcome::Failed {
                        error,
                        attempts: attempt,
                    };
                }
            }
        }
    }

    async fn attempt_once(
        &self,
        task: &DownloadTask,
    ) -> Result<(PersistedImage, Option<u64>), DownloadError> {
        let payload = self.client.fetch_bytes(task.url()).await?;
        let persisted = decode_and_persist(
            Arc::clone(&self.decoder),
            task.url(),
            payload.bytes,
            task.destination(),
        )
        .await?;
        Ok((persisted, payload.content_length))
    }
}
