use std::sync::Arc;

use rosetrack_common::attribution::{STORAGE_KEY, UTM_KEYS};
use rosetrack_common::event::category;
use rosetrack_common::{AttributionParams, Event};
use url::Url;

use crate::emitter::EventEmitter;
use crate::storage::SessionStore;

/// Base used to resolve path-only locations such as `/?utm_source=x`.
const RELATIVE_BASE: &str = "http://localhost/";

/// Parse a page location, absolute or path-relative.
pub(crate) fn parse_location(location: &str) -> Option<Url> {
    let base = Url::parse(RELATIVE_BASE).ok()?;
    Url::options().base_url(Some(&base)).parse(location).ok()
}

/// Read the five UTM parameters from `location`.
///
/// The first occurrence of each parameter wins. Absent and empty values are
/// both reported as unset. A location that cannot be parsed yields all-unset.
pub fn extract(location: &str) -> AttributionParams {
    let mut params = AttributionParams::default();
    let Some(url) = parse_location(location) else {
        tracing::debug!(location, "unparseable location; attribution left unset");
        return params;
    };
    for key in UTM_KEYS {
        let value = url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty());
        if let Some(slot) = params.slot_mut(key) {
            *slot = value;
        }
    }
    params
}

/// Attribution previously written to session storage, if any.
pub fn stored(store: &dyn SessionStore) -> Option<AttributionParams> {
    store
        .get(STORAGE_KEY)
        .and_then(|json| AttributionParams::from_json(&json))
}

/// Captures campaign attribution once per full page load.
pub struct AttributionCapture {
    emitter: Arc<EventEmitter>,
    store: Arc<dyn SessionStore>,
}

impl AttributionCapture {
    pub fn new(emitter: Arc<EventEmitter>, store: Arc<dyn SessionStore>) -> Self {
        Self { emitter, store }
    }

    /// Extract attribution from `location` and record it when non-empty.
    ///
    /// A non-empty result emits one `utm_parameters` event and overwrites the
    /// stored value. An empty result touches neither, so attribution from an
    /// earlier page in the session survives. Visiting the same tagged URL
    /// again emits again.
    pub fn capture(&self, location: &str) -> AttributionParams {
        let params = extract(location);
        if params.is_empty() {
            return params;
        }
        let json = params.to_json();
        self.emitter
            .emit(&Event::new("utm_parameters", category::ATTRIBUTION).with_label(json.clone()));
        if let Err(e) = self.store.set(STORAGE_KEY, &json) {
            tracing::warn!("failed to persist attribution: {e:#}");
        }
        tracing::debug!(attribution = %json, "utm parameters tracked");
        params
    }
}
