//! Shared User-Agent string for image fetch requests.

/// Default User-Agent for image requests (identifies the tool and version).
#[must_use]
pub(crate) fn default_fetch_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("imgpull/{version} (batch-image-fetcher)")
}
