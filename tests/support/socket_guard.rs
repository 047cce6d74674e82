//! Skips socket-bound tests where localhost sockets cannot be bound.
//!
//! Set `IMGPULL_REQUIRE_SOCKET_TESTS=1` in CI to turn a skip into a failure.

use std::net::TcpListener;
use std::panic::Location;

use wiremock::MockServer;

fn sockets_required() -> bool {
    std::env::var("IMGPULL_REQUIRE_SOCKET_TESTS")
        .is_ok_and(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

fn report_unavailable(location: &Location<'_>) {
    let message = format!(
        "[socket-bound-test] {}:{} cannot bind a localhost socket",
        location.file(),
        location.line()
    );
    assert!(!sockets_required(), "{message}");
    eprintln!("{message}; skipping");
}

/// Binds a raw localhost listener on an ephemeral port, or returns `None`
/// (after logging) when sockets are unavailable.
#[track_caller]
pub fn listener_or_skip() -> Option<TcpListener> {
    match TcpListener::bind("127.0.0.1:0") {
        Ok(listener) => Some(listener),
        Err(_) => {
            report_unavailable(Location::caller());
            None
        }
    }
}

/// Starts a mock server, or returns `None` (after logging) when sockets are unavailable.
#[track_caller]
pub fn mock_server_or_skip() -> impl std::future::Future<Output = Option<MockServer>> {
    let available = TcpListener::bind("127.0.0.1:0").is_ok();
    if !available {
        report_unavailable(Location::caller());
    }

    async move {
        if available {
            Some(MockServer::start().await)
        } else {
            None
        }
    }
}
