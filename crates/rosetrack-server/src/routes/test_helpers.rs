//! Shared test utilities for route handler tests.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc, clippy::panic)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};

use crate::sink::TelemetrySink;
use crate::state::AppState;

/// Route `tracing` output into the test harness buffer. Repeat calls are no-ops.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("rosetrack_server=debug")
        .try_init();
}

/// State trusting proxy headers, as in the default deployment.
pub fn make_state(sink: Arc<dyn TelemetrySink>) -> AppState {
    AppState {
        sink,
        trust_proxy: true,
    }
}

/// `GET uri` with the given headers and, optionally, a TCP peer address.
pub fn get_request(uri: &str, headers: &[(&str, &str)], peer: Option<SocketAddr>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    if let Some(addr) = peer {
        builder = builder.extension(ConnectInfo(addr));
    }
    builder.body(Body::empty()).unwrap()
}

/// Assert an HTTP response has the expected status code and return the body.
///
/// On failure, prints the body so test output shows what went wrong.
pub async fn assert_status(resp: axum::response::Response, expected: StatusCode) -> axum::body::Bytes {
    let actual = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), 65536)
        .await
        .unwrap_or_default();
    if actual != expected {
        let body_str = String::from_utf8_lossy(&body);
        panic!(
            "assertion `left == right` failed\n  left: {actual}\n right: {expected}\n  body: {body_str}"
        );
    }
    body
}
