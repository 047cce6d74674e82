//! HTTP client wrapper for fetching image payloads.
//!
//! This module provides the `HttpClient` struct which performs a single GET
//! with connect and per-request timeouts, rejecting any status other than 200
//! and reading the full body into memory for decoding.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, REQUEST_TIMEOUT_SECS};
use super::error::DownloadError;
use crate::user_agent;

/// HTTP client for fetching image payloads.
///
/// This client is designed to be created once per run and shared by every
/// fetch worker, taking advantage of connection pooling.
///
/// # Example
///
/// ```no_run
/// use imgpull_core::download::HttpClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new()?;
/// let payload = client.fetch_bytes("https://example.com/cat.jpg").await?;
/// println!("fetched {} bytes", payload.bytes.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

/// A fully received 200 response body.
#[derive(Debug, Clone)]
pub struct FetchedPayload {
    /// Response body.
    pub bytes: Vec<u8>,
    /// Content-Length advertised by the server, if any.
    pub content_length: Option<u64>,
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Request timeout: 5 minutes (connect, headers and body)
    /// - Gzip decompression: enabled
    ///
    /// # Errors
    ///
    /// Returns the underlying reqwest error if the client cannot be built
    /// (e.g. the TLS backend fails to initialize).
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeouts(
            Duration::from_secs(CONNECT_TIMEOUT_SECS),
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        )
    }

    /// Creates a new HTTP client with explicit timeout values.
    ///
    /// # Errors
    ///
    /// Returns the underlying reqwest error if the client cannot be built.
    #[instrument(level = "debug")]
    pub fn with_timeouts(
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .gzip(true)
            .user_agent(user_agent::default_fetch_user_agent())
            .build()?;
        Ok(Self { client })
    }

    /// Fetches the full body of `url`.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is invalid or not http(s) ([`DownloadError::InvalidUrl`])
    /// - The request or body read fails ([`DownloadError::Network`], [`DownloadError::Timeout`])
    /// - The server returns any status other than 200 ([`DownloadError::HttpStatus`])
    #[instrument(level = "debug", skip(self), fields(url = %url))]
    pub async fn fetch_bytes(&self, url: &str) -> Result<FetchedPayload, DownloadError> {
        let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DownloadError::invalid_url(url));
        }

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| DownloadError::from_reqwest(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let content_length = response.content_length();
        let body = response
            .bytes()
            .await
            .map_err(|e| DownloadError::from_reqwest(url, e))?;

        debug!(
            bytes = body.len(),
            content_length = ?content_length,
            "response body received"
        );

        Ok(FetchedPayload {
            bytes: Vec::from(body),
            content_length,
        })
    }

    /// Returns a reference to the underlying reqwest client.
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client() -> HttpClient {
        HttpClient::with_timeouts(Duration::from_secs(2), Duration::from_millis(500)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_bytes_rejects_non_http_scheme() {
        let result = test_client().fetch_bytes("ftp://example.com/a.png").await;
        assert!(matches!(result, Err(DownloadError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_fetch_bytes_rejects_unparseable_url() {
        let result = test_client().fetch_bytes("not a url").await;
        assert!(matches!(result, Err(DownloadError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_fetch_bytes_returns_body_and_length() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/img.bin"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"abcdef".to_vec()))
            .mount(&server)
            .await;

        let payload = test_client()
            .fetch_bytes(&format!("{}/img.bin", server.uri()))
            .await
            .unwrap();

        assert_eq!(payload.bytes, b"abcdef");
        assert_eq!(payload.content_length, Some(6));
    }

    #[tokio::test]
    async fn test_fetch_bytes_non_200_success_status_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/partial"))
            .respond_with(ResponseTemplate::new(206).set_body_bytes(b"ab".to_vec()))
            .mount(&server)
            .await;

        let result = test_client()
            .fetch_bytes(&format!("{}/partial", server.uri()))
            .await;

        assert!(matches!(
            result,
            Err(DownloadError::HttpStatus { status: 206, .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_bytes_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"x".to_vec())
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let result = test_client()
            .fetch_bytes(&format!("{}/slow", server.uri()))
            .await;

        assert!(matches!(result, Err(DownloadError::Timeout { .. })));
    }
}
