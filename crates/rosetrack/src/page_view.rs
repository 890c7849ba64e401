use std::sync::Arc;

use rosetrack_common::Event;
use rosetrack_common::event::category;

use crate::emitter::EventEmitter;

/// Navigation signal supplied by the hosting framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteEvent {
    Start(String),
    /// The route finished loading; carries pathname plus query.
    Complete(String),
    Error(String),
}

/// Pathname plus `?query` when the query is non-empty.
pub fn page_url(pathname: &str, query: &str) -> String {
    let query = query.strip_prefix('?').unwrap_or(query);
    if query.is_empty() {
        pathname.to_string()
    } else {
        format!("{pathname}?{query}")
    }
}

/// Reports initial loads and completed in-app navigations.
pub struct PageViewReporter {
    emitter: Arc<EventEmitter>,
    measurement_id: String,
}

impl PageViewReporter {
    pub fn new(emitter: Arc<EventEmitter>, measurement_id: impl Into<String>) -> Self {
        Self {
            emitter,
            measurement_id: measurement_id.into(),
        }
    }

    pub fn report_page_view(&self, url: &str) {
        self.emitter.configure(&self.measurement_id, url);
        self.emitter
            .emit(&Event::new("page_view", category::NAVIGATION).with_label(url));
        tracing::debug!(url, "page view tracked");
    }

    /// Report a page view for a completed route. Starts and errors are
    /// ignored so aborted navigations never count. Returns the reported url.
    pub fn on_route_event<'a>(&self, event: &'a RouteEvent) -> Option<&'a str> {
        match event {
            RouteEvent::Complete(url) => {
                self.report_page_view(url);
                Some(url)
            }
            RouteEvent::Start(_) | RouteEvent::Error(_) => None,
        }
    }
}
