//! Shared helpers for integration tests.

#![allow(dead_code)]

/// Binds a started mock server or returns early from the test.
macro_rules! require_mock_server {
    () => {{
        let Some(server) = $crate::support::socket_guard::mock_server_or_skip().await else {
            return;
        };
        server
    }};
}

pub mod images;
pub mod socket_guard;
