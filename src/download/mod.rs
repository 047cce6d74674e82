//! Bounded-concurrency fetch, convert and persist pipeline.
//!
//! This module provides the pieces a batch run is built from:
//!
//! - [`HttpClient`] performs one GET with connect and request timeouts
//! - [`RetryPolicy`] decides whether a failed attempt is retried
//! - [`FetchWorker`] takes one [`DownloadTask`] to a terminal [`FetchOutcome`]
//! - [`ConcurrencyGate`] caps how many workers run at once
//! - [`DownloadEngine`] fans a batch out under the gate and returns a [`BatchReport`]
//!
//! Output paths are derived from task identifiers alone, so rerunning a batch
//! skips everything that already completed.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use imgpull_core::decode::Decoder;
//! use imgpull_core::download::{DownloadTask, FetchWorker, HttpClient, RetryPolicy};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let worker = FetchWorker::new(HttpClient::new()?, Decoder::primary_only(), RetryPolicy::default());
//! let task = DownloadTask::new("cat", "https://example.com/cat.jpg", Path::new("./data/img"));
//! let outcome = worker.fetch(&task).await;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod engine;
mod error;
mod filename;
mod gate;
mod persist;
mod retry;
mod task;
mod worker;

pub use client::{FetchedPayload, HttpClient};
pub use constants::{CONNECT_TIMEOUT_SECS, DEFAULT_RETRY_BACKOFF, REQUEST_TIMEOUT_SECS};
pub use engine::{
    BatchReport, DEFAULT_MAX_CONCURRENT, DownloadEngine, EngineError, FailureRecord, TaskReport,
};
pub use error::DownloadError;
pub use filename::{destination_path, identifier_from_url_tail, sanitize_identifier};
pub use gate::{ConcurrencyGate, GateSlot};
pub use persist::PersistedImage;
pub use retry::{DEFAULT_MAX_RETRIES, FailureType, RetryDecision, RetryPolicy, classify_error};
pub use task::DownloadTask;
pub use worker::{FetchOutcome, FetchWorker};
