use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use rosetrack_common::pixel::UNKNOWN;

/// Axum extractor that resolves the TCP peer IP from `ConnectInfo<SocketAddr>`.
///
/// `None` when the router is served without connect info, as in
/// `Router::oneshot` tests.
pub struct PeerIp(pub Option<String>);

impl<S: Send + Sync> axum::extract::FromRequestParts<S> for PeerIp {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ci| ci.0.ip().to_string());
        Ok(Self(ip))
    }
}

/// Resolve the client address for a request.
///
/// With `trust_proxy`, the first non-empty `X-Forwarded-For` entry wins.
/// Otherwise, or when the header is absent, the TCP peer address is used,
/// and `"unknown"` when there is none.
///
/// `X-Forwarded-For` is client-controlled; trust it only behind a proxy that
/// overwrites it.
pub fn extract_ip(headers: &HeaderMap, trust_proxy: bool, peer_ip: Option<&str>) -> String {
    if trust_proxy
        && let Some(ip) = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    {
        return ip.to_string();
    }
    peer_ip.map_or_else(|| UNKNOWN.to_string(), ToString::to_string)
}
