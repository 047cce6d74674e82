//! Batch driver for concurrent fetch-convert-persist runs.
//!
//! This module provides the `DownloadEngine` which fans out one tokio task per
//! [`DownloadTask`], bounds how many run at once with a [`ConcurrencyGate`],
//! and aggregates every per-task outcome into a [`BatchReport`].
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use imgpull_core::decode::Decoder;
//! use imgpull_core::download::{DownloadEngine, DownloadTask, FetchWorker, HttpClient, RetryPolicy};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let worker = FetchWorker::new(HttpClient::new()?, Decoder::primary_only(), RetryPolicy::default());
//! let engine = DownloadEngine::new(10, worker)?;
//! let tasks = vec![DownloadTask::new("cat", "https://example.com/cat.jpg", Path::new("./data/img"))];
//! let report = engine.run(tasks).await?;
//! println!("Succeeded: {}, Failed: {}, Skipped: {}", report.succeeded, report.failed, report.skipped);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use super::error::DownloadError;
use super::gate::ConcurrencyGate;
use super::retry::{FailureType, classify_error};
use super::task::DownloadTask;
use super::worker::{FetchOutcome, FetchWorker};

/// Minimum allowed concurrency value.
const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
const MAX_CONCURRENCY: usize = 100;

/// Default number of fetch units admitted at once.
pub const DEFAULT_MAX_CONCURRENT: usize = 10;

/// Error type for download engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },

    /// The concurrency gate was closed while units were waiting.
    #[error("concurrency gate closed unexpectedly")]
    GateClosed,
}

/// A finished task and how it ended.
#[derive(Debug)]
pub struct TaskReport {
    /// The task that ran.
    pub task: DownloadTask,
    /// Its terminal outcome.
    pub outcome: FetchOutcome,
}

/// One failed task in a [`BatchReport`].
#[derive(Debug, Clone, Serialize)]
pub struct FailureRecord {
    /// Task identifier.
    pub identifier: String,
    /// Source URL.
    pub url: String,
    /// Failure classification of the last error.
    pub kind: FailureType,
    /// Attempts made before giving up.
    pub attempts: u32,
    /// Rendered last error.
    pub message: String,
}

/// Aggregated result of one batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// Tasks whose output already existed.
    pub skipped: usize,
    /// Tasks that produced a new output file.
    pub succeeded: usize,
    /// Tasks that ended without an output file.
    pub failed: usize,
    /// Retry attempts made across all tasks.
    pub retried: usize,
    /// Highest number of units that held a gate slot at once.
    pub peak_concurrency: usize,
    /// Per-task failure details.
    pub failures: Vec<FailureRecord>,
}

impl BatchReport {
    /// Total tasks accounted for.
    #[must_use]
    pub fn total(&self) -> usize {
        self.skipped + self.succeeded + self.failed
    }

    /// Returns true when at least one task was attempted and every attempted
    /// task failed.
    #[must_use]
    pub fn all_attempted_failed(&self) -> bool {
        self.failed > 0 && self.succeeded == 0 && self.skipped == 0
    }

    fn record(&mut self, report: &TaskReport) {
        let attempts = report.outcome.attempts();
        self.retried += attempts.saturating_sub(1) as usize;

        match &report.outcome {
            FetchOutcome::Skipped { .. } => self.skipped += 1,
            FetchOutcome::Success { .. } => self.succeeded += 1,
            FetchOutcome::Failed { error, attempts } => {
                self.failed += 1;
                self.failures.push(FailureRecord {
                    identifier: report.task.identifier().to_string(),
                    url: report.task.url().to_string(),
                    kind: classify_error(error),
                    attempts: *attempts,
                    message: error.to_string(),
                });
            }
        }
    }
}

/// Concurrent batch driver.
///
/// # Concurrency Model
///
/// - Each task runs in its own tokio task
/// - A gate slot is acquired inside the unit before the worker runs
/// - Slots are released automatically when the unit ends (RAII)
/// - All units are joined before the report is returned
///
/// Individual task failures never abort the batch.
#[derive(Debug)]
pub struct DownloadEngine {
    max_concurrent: usize,
    worker: FetchWorker,
}

impl DownloadEngine {
    /// Creates an engine admitting `max_concurrent` units at once.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if the value is outside
    /// the valid range (1-100).
    #[instrument(level = "debug", skip(worker))]
    pub fn new(max_concurrent: usize, worker: FetchWorker) -> Result<Self, EngineError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&max_concurrent) {
            return Err(EngineError::InvalidConcurrency {
                value: max_concurrent,
            });
        }

        debug!(
            max_concurrent,
            max_retries = worker.retry_policy().max_attempts(),
            backoff_ms = worker.retry_policy().backoff().as_millis(),
            fallback = ?worker.decoder().fallback_name(),
            "creating download engine"
        );

        Ok(Self {
            max_concurrent,
            worker,
        })
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Runs every task to completion.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GateClosed`] if the gate is closed mid-run.
    pub async fn run(&self, tasks: Vec<DownloadTask>) -> Result<BatchReport, EngineError> {
        self.run_with_observer(tasks, |_| {}).await
    }

    /// Runs every task to completion, calling `observer` as each one finishes.
    ///
    /// The observer is called from the unit's own task, in completion order.
    /// A unit that panics is recorded as a failure without reaching the observer.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GateClosed`] if the gate is closed mid-run.
    #[instrument(skip(self, tasks, observer), fields(tasks = tasks.len(), max_concurrent = self.max_concurrent))]
    pub async fn run_with_observer<F>(
        &self,
        tasks: Vec<DownloadTask>,
        observer: F,
    ) -> Result<BatchReport, EngineError>
    where
        F: Fn(&TaskReport) + Send + Sync + 'static,
    {
        let existing = tasks
            .iter()
            .filter(|task| task.destination().exists())
            .count();
        info!(
            total = tasks.len(),
            existing,
            pending = tasks.len() - existing,
            "starting batch"
        );

        let gate = ConcurrencyGate::new(self.max_concurrent);
        let observer = Arc::new(observer);
        let mut handles: Vec<(DownloadTask, JoinHandle<Result<TaskReport, EngineError>>)> =
            Vec::with_capacity(tasks.len());

        for task in tasks {
            let gate = gate.clone();
            let worker = self.worker.clone();
            let observer = Arc::clone(&observer);
            let unit_task = task.clone();

            handles.push((
                task,
                tokio::spawn(async move {
                    // Slot is dropped when this block exits (RAII)
                    let _slot = gate.acquire().await?;
                    let outcome = worker.fetch(&unit_task).await;
                    let report = TaskReport {
                        task: unit_task,
                        outcome,
                    };
                    observer(&report);
                    Ok(report)
                }),
            ));
        }

        debug!(task_count = handles.len(), "waiting for units to complete");

        let mut batch = BatchReport::default();
        let mut gate_error = None;
        for (task, handle) in handles {
            match handle.await {
                Ok(Ok(report)) => batch.record(&report),
                Ok(Err(e)) => {
                    warn!(identifier = %task.identifier(), error = %e, "unit could not acquire gate");
                    gate_error.get_or_insert(e);
                }
                Err(join_error) => {
                    warn!(identifier = %task.identifier(), error = %join_error, "fetch unit panicked");
                    // The observer may be what panicked; do not call it again here.
                    batch.record(&panicked_report(task, &join_error));
                }
            }
        }

        if let Some(e) = gate_error {
            return Err(e);
        }

        batch.peak_concurrency = gate.peak();
        info!(
            skipped = batch.skipped,
            succeeded = batch.succeeded,
            failed = batch.failed,
            retried = batch.retried,
            peak_concurrency = batch.peak_concurrency,
            total = batch.total(),
            "batch complete"
        );

        Ok(batch)
    }
}

fn panicked_report(task: DownloadTask, join_error: &tokio::task::JoinError) -> TaskReport {
    let error = DownloadError::io(
        task.destination(),
        std::io::Error::other(format!("fetch unit panicked: {join_error}")),
    );
    TaskReport {
        task,
        outcome: FetchOutcome::Failed { error, attempts: 0 },
    }
}
