//! imgpull Core Library
//!
//! This library provides the core functionality for the imgpull tool, which
//! fetches large batches of remote image URLs, normalizes every payload to an
//! RGBA PNG, and writes one output file per source URL.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`decode`] - Primary raster codec with container-format fallback
//! - [`download`] - HTTP fetch worker, retry policy, concurrency gate and batch engine
//! - [`parser`] - Line-delimited input lists turned into download tasks

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod decode;
pub mod download;
pub mod parser;

mod user_agent;

// Re-export commonly used types
pub use decode::{
    ContainerCodec, DecodeError, DecodeSource, DecodedImage, Decoder, PixelLayout, RawPlane,
};
pub use download::{
    BatchReport, ConcurrencyGate, DEFAULT_MAX_CONCURRENT, DEFAULT_MAX_RETRIES,
    DEFAULT_RETRY_BACKOFF, DownloadEngine, DownloadError, DownloadTask, EngineError, FailureType,
    FetchOutcome, FetchWorker, HttpClient, RetryDecision, RetryPolicy, TaskReport, classify_error,
};
pub use parser::{IdentifierStrategy, ParseResult, Platform, parse_task_list};
