//! Retry logic with a fixed backoff for transient fetch failures.
//!
//! This module provides the [`RetryPolicy`] and [`FailureType`] types for
//! classifying fetch errors and determining retry behavior.
//!
//! # Overview
//!
//! When an attempt fails, the error is classified into a [`FailureType`]:
//! - [`FailureType::TransientNetwork`] - timeouts and connection errors, retried
//! - [`FailureType::DeterministicRejection`] - any non-200 status, never retried
//! - [`FailureType::Undecodable`] - payload neither codec understands, never retried
//! - [`FailureType::Local`] - invalid URL or local I/O failure, never retried
//!
//! The [`RetryPolicy`] then decides whether another attempt is made and how
//! long to wait before it.
//!
//! # Example
//!
//! ```
//! use imgpull_core::download::{
//!     DownloadError, RetryPolicy, RetryDecision, classify_error
//! };
//!
//! let policy = RetryPolicy::default();
//! let error = DownloadError::timeout("https://example.com/a.jpg");
//!
//! match policy.should_retry(classify_error(&error), 1) {
//!     RetryDecision::Retry { delay, attempt } => {
//!         println!("Retrying in {:?} (attempt {})", delay, attempt);
//!     }
//!     RetryDecision::DoNotRetry { reason } => {
//!         println!("Not retrying: {}", reason);
//!     }
//! }
//! ```

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, instrument};

use super::DownloadError;
use super::constants::DEFAULT_RETRY_BACKOFF;

/// Default maximum attempts per image.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Classification of fetch failure types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureType {
    /// Timeout or connection-level failure that may succeed on retry.
    TransientNetwork,

    /// The server answered with a non-200 status; the answer will not change.
    DeterministicRejection,

    /// The payload matched neither the primary nor the fallback codec.
    Undecodable,

    /// Invalid URL or local file system failure.
    Local,
}

impl FailureType {
    /// Stable label used in logs and summaries.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TransientNetwork => "transient_network",
            Self::DeterministicRejection => "deterministic_rejection",
            Self::Undecodable => "undecodable",
            Self::Local => "local",
        }
    }
}

/// Decision on whether to retry a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after the specified delay.
    Retry {
        /// How long to wait before retrying.
        delay: Duration,
        /// Which attempt number this will be (1-indexed, so first retry is attempt 2).
        attempt: u32,
    },

    /// Do not retry.
    DoNotRetry {
        /// Human-readable reason why retry is not attempted.
        reason: String,
    },
}

/// Bounded retry with a fixed backoff between attempts.
///
/// # Default Values
///
/// - `max_attempts`: 3 (including the initial attempt)
/// - `backoff`: 5 seconds
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the initial attempt).
    max_attempts: u32,

    /// Fixed delay before each retry.
    backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_RETRIES,
            backoff: DEFAULT_RETRY_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// Creates a new retry policy.
    ///
    /// `max_attempts` is clamped to at least 1.
    #[must_use]
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Creates a policy with a custom `max_attempts` and the default backoff.
    #[must_use]
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self::new(max_attempts, DEFAULT_RETRY_BACKOFF)
    }

    /// Returns the maximum number of attempts configured.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the fixed backoff between attempts.
    #[must_use]
    pub fn backoff(&self) -> Duration {
        self.backoff
    }

    /// Determines whether to retry after `attempt` (1-indexed) failed with `failure_type`.
    #[instrument(level = "debug", skip(self), fields(max_attempts = self.max_attempts))]
    pub fn should_retry(&self, failure_type: FailureType, attempt: u32) -> RetryDecision {
        match failure_type {
            FailureType::DeterministicRejection => {
                return RetryDecision::DoNotRetry {
                    reason: "server rejected the request - retry would not help".to_string(),
                };
            }
            FailureType::Undecodable => {
                return RetryDecision::DoNotRetry {
                    reason: "payload cannot be decoded - retry would fetch the same bytes"
                        .to_string(),
                };
            }
            FailureType::Local => {
                return RetryDecision::DoNotRetry {
                    reason: "local failure - retry would not help".to_string(),
                };
            }
            FailureType::TransientNetwork => {}
        }

        if attempt >= self.max_attempts {
            debug!(attempt, max = self.max_attempts, "max attempts reached");
            return RetryDecision::DoNotRetry {
                reason: format!("max attempts ({}) exhausted", self.max_attempts),
            };
        }

        debug!(
            attempt,
            next_attempt = attempt + 1,
            delay_ms = self.backoff.as_millis(),
            "will retry"
        );

        RetryDecision::Retry {
            delay: self.backoff,
            attempt: attempt + 1,
        }
    }
}

/// Classifies a fetch error into a failure type for retry decisions.
///
/// | Error | Type |
/// |-------|------|
/// | Timeout | TransientNetwork |
/// | Network | TransientNetwork |
/// | HttpStatus (any) | DeterministicRejection |
/// | Decode | Undecodable |
/// | Io, InvalidUrl | Local |
#[must_use]
pub fn classify_error(error: &DownloadError) -> FailureType {
    match error {
        DownloadError::Timeout { .. } | DownloadError::Network { .. } => {
            FailureType::TransientNetwork
        }
        DownloadError::HttpStatus { .. } => FailureType::DeterministicRejection,
        DownloadError::Decode { .. } => FailureType::Undecodable,
        DownloadError::Io { .. } | DownloadError::InvalidUrl { .. } => FailureType::Local,
    }
}
