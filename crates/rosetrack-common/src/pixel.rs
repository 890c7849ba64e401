use serde::{Deserialize, Serialize};

/// Route the tracking pixel is served from.
pub const PIXEL_PATH: &str = "/api/pixel";

/// Placeholder for any request attribute that could not be determined.
pub const UNKNOWN: &str = "unknown";

/// Referer recorded when the request carried none.
pub const DIRECT_REFERER: &str = "direct";

/// One tracking-pixel hit, written once to the telemetry sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelRequestRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub page: String,
    pub timestamp: String,
    pub ip: String,
    pub user_agent: String,
    pub referer: String,
    pub message: String,
}

impl PixelRequestRecord {
    pub fn page_view(
        page: impl Into<String>,
        timestamp: impl Into<String>,
        ip: impl Into<String>,
        user_agent: impl Into<String>,
        referer: impl Into<String>,
    ) -> Self {
        let page = page.into();
        let message = format!("page={page}");
        Self {
            kind: "pageview".to_string(),
            page,
            timestamp: timestamp.into(),
            ip: ip.into(),
            user_agent: user_agent.into(),
            referer: referer.into(),
            message,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn page_view_fills_kind_and_message() {
        let rec = PixelRequestRecord::page_view("home", "123", "10.0.0.1", "curl/8", DIRECT_REFERER);
        assert_eq!(rec.kind, "pageview");
        assert_eq!(rec.message, "page=home");
        assert_eq!(rec.referer, "direct");
    }

    #[test]
    fn serializes_with_log_field_names() {
        let rec = PixelRequestRecord::page_view("home", "123", "10.0.0.1", "curl/8", "direct");
        let json: serde_json::Value = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["type"], "pageview");
        assert_eq!(json["userAgent"], "curl/8");
        assert!(json.get("user_agent").is_none());
        assert!(json.get("kind").is_none());
    }
}
