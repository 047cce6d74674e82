//! Constants for the download module (timeouts, backoff, output naming).

use std::time::Duration;

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default per-request timeout covering connect, headers and body (5 minutes).
pub const REQUEST_TIMEOUT_SECS: u64 = 300;

/// Default fixed delay between attempts after a transient network failure.
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(5);

/// Extension of every output file; all payloads are normalized to PNG.
pub const OUTPUT_EXTENSION: &str = "png";
