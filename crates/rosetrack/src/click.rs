use std::sync::Arc;

use rosetrack_common::{AttributionParams, Event};
use url::form_urlencoded;

use crate::conversion::ConversionReporter;
use crate::emitter::EventEmitter;

/// Host fragment identifying WhatsApp click-to-chat links.
const WHATSAPP_HOST: &str = "wa.me";

/// A tracked call-to-action on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedLink {
    pub href: String,
    pub event_name: String,
    pub category: String,
    pub is_conversion: bool,
}

impl TrackedLink {
    pub fn new(
        href: impl Into<String>,
        event_name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            href: href.into(),
            event_name: event_name.into(),
            category: category.into(),
            is_conversion: false,
        }
    }

    #[must_use]
    pub const fn conversion(mut self) -> Self {
        self.is_conversion = true;
        self
    }
}

/// What the page should do after a tracked click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Let the browser follow the original `href`.
    FollowHref,
    /// Cancel the default navigation and open this url in a new tab.
    OpenInNewTab(String),
}

/// Links starting with `http` leave the page and open in a new tab.
pub fn opens_externally(href: &str) -> bool {
    href.starts_with("http")
}

/// Append ` (via source[/medium])` to the `text` parameter of a WhatsApp
/// link so the order message carries its campaign.
///
/// Returns `None` for non-WhatsApp links or when no source is known.
pub fn tag_whatsapp_link(href: &str, attribution: &AttributionParams) -> Option<String> {
    if !href.contains(WHATSAPP_HOST) {
        return None;
    }
    let source = attribution.utm_source.as_deref()?;
    let (base, query) = href.split_once('?').unwrap_or((href, ""));
    let mut pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();

    let mut message = pairs
        .iter()
        .find(|(k, _)| k == "text")
        .map(|(_, v)| v.clone())
        .unwrap_or_default();
    message.push_str(" (via ");
    message.push_str(source);
    if let Some(medium) = attribution.utm_medium.as_deref() {
        message.push('/');
        message.push_str(medium);
    }
    message.push(')');

    // Same as URLSearchParams::set: replace the first `text`, drop the others.
    match pairs.iter().position(|(k, _)| k == "text") {
        Some(i) => {
            pairs[i].1 = message;
            let mut seen = false;
            pairs.retain(|(k, _)| {
                if k != "text" {
                    return true;
                }
                let keep = !seen;
                seen = true;
                keep
            });
        }
        None => pairs.push(("text".to_string(), message)),
    }

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(&pairs)
        .finish();
    Some(format!("{base}?{query}"))
}

/// Handles clicks on tracked calls-to-action.
pub struct ClickTracker {
    emitter: Arc<EventEmitter>,
    conversions: Arc<ConversionReporter>,
}

impl ClickTracker {
    pub fn new(emitter: Arc<EventEmitter>, conversions: Arc<ConversionReporter>) -> Self {
        Self {
            emitter,
            conversions,
        }
    }

    /// Record the click and decide where it leads.
    ///
    /// `attribution` is the campaign read from the current page url.
    pub fn click(&self, link: &TrackedLink, attribution: &AttributionParams) -> ClickOutcome {
        self.emitter.emit(
            &Event::new(link.event_name.as_str(), link.category.as_str())
                .with_label(link.href.as_str()),
        );
        if link.is_conversion {
            self.conversions.report_conversion(&link.event_name);
        }
        tag_whatsapp_link(&link.href, attribution)
            .map_or(ClickOutcome::FollowHref, ClickOutcome::OpenInNewTab)
    }
}
