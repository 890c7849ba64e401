use serde::{Deserialize, Serialize};

/// Query parameter names, in canonical order.
pub const UTM_KEYS: [&str; 5] = [
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_content",
    "utm_term",
];

/// Session-storage key holding the JSON-encoded [`AttributionParams`].
pub const STORAGE_KEY: &str = "utm_params";

/// Campaign attribution read from a page URL.
///
/// `None` means the parameter was absent (or empty) in the URL. The JSON form
/// uses camelCase keys in a fixed order and omits unset fields, so two equal
/// values always serialize to the same string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributionParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_campaign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_term: Option<String>,
}

impl AttributionParams {
    /// True when no attribution field is set.
    pub const fn is_empty(&self) -> bool {
        self.utm_source.is_none()
            && self.utm_medium.is_none()
            && self.utm_campaign.is_none()
            && self.utm_content.is_none()
            && self.utm_term.is_none()
    }

    /// Mutable slot for a raw query parameter name, if it is one of [`UTM_KEYS`].
    pub fn slot_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
        match key {
            "utm_source" => Some(&mut self.utm_source),
            "utm_medium" => Some(&mut self.utm_medium),
            "utm_campaign" => Some(&mut self.utm_campaign),
            "utm_content" => Some(&mut self.utm_content),
            "utm_term" => Some(&mut self.utm_term),
            _ => None,
        }
    }

    /// Canonical JSON encoding, used both as event label and storage value.
    pub fn to_json(&self) -> String {
        // Only optional strings: serialization has no failure path.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Decode a previously stored value. Malformed input yields `None`.
    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }
}
