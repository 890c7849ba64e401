use axum::extract::{Query, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE, EXPIRES, PRAGMA, REFERER, USER_AGENT};
use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::response::IntoResponse;
use rosetrack_common::PixelRequestRecord;
use rosetrack_common::pixel::{DIRECT_REFERER, UNKNOWN};

use super::ip::{PeerIp, extract_ip};
use crate::state::AppState;

/// 1x1 transparent GIF89a.
pub static PIXEL_GIF: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0xff, 0xff, 0xff,
    0x00, 0x00, 0x00, 0x21, 0xf9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00, 0x00, 0x00,
    0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3b,
];

pub const NO_CACHE: &str = "no-cache, no-store, must-revalidate";

/// First value of `key`, as URLSearchParams reads it; empty counts as absent.
fn first_param<'a>(query: &'a [(String, String)], key: &str) -> Option<&'a str> {
    query
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .filter(|v| !v.is_empty())
}

fn header_or<'a>(headers: &'a HeaderMap, name: &HeaderName, fallback: &'a str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or(fallback)
}

/// `GET /api/pixel?page=&t=`: record the hit, answer with an uncacheable GIF.
///
/// A failing sink is logged; the image is served regardless so the page
/// never shows a broken image.
pub async fn pixel(
    State(state): State<AppState>,
    PeerIp(peer_ip): PeerIp,
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
) -> impl IntoResponse {
    let page = first_param(&query, "page").unwrap_or(UNKNOWN);
    let timestamp = first_param(&query, "t").map_or_else(
        || chrono::Utc::now().timestamp_millis().to_string(),
        ToString::to_string,
    );
    let ip = extract_ip(&headers, state.trust_proxy, peer_ip.as_deref());
    let record = PixelRequestRecord::page_view(
        page,
        timestamp,
        ip,
        header_or(&headers, &USER_AGENT, UNKNOWN),
        header_or(&headers, &REFERER, DIRECT_REFERER),
    );

    if let Err(e) = state.sink.record(&record).await {
        tracing::error!(page = %record.page, "failed to record pixel request: {e:#}");
    }

    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "image/gif"),
            (CACHE_CONTROL, NO_CACHE),
            (PRAGMA, "no-cache"),
            (EXPIRES, "0"),
        ],
        PIXEL_GIF,
    )
}
