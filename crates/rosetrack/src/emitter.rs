use std::sync::Arc;

use rosetrack_common::Event;

use crate::backend::Backend;

/// Fans a single event out to every registered backend.
///
/// Dispatch never fails from the caller's point of view: each backend is
/// tried independently and a failing one is logged and skipped.
#[derive(Default, Clone)]
pub struct EventEmitter {
    backends: Vec<Arc<dyn Backend>>,
}

impl EventEmitter {
    pub fn new(backends: Vec<Arc<dyn Backend>>) -> Self {
        Self { backends }
    }

    pub fn register(&mut self, backend: Arc<dyn Backend>) {
        self.backends.push(backend);
    }

    pub fn backend_count(&self) -> usize {
        self.backends.len()
    }

    pub fn emit(&self, event: &Event) {
        if self.backends.is_empty() {
            tracing::debug!(action = %event.action, "no analytics backend registered; event dropped");
            return;
        }
        let params = event.params();
        for backend in &self.backends {
            if let Err(e) = backend.event(&event.action, &params) {
                tracing::warn!(
                    backend = backend.name(),
                    action = %event.action,
                    "event dispatch failed: {e:#}"
                );
            }
        }
        tracing::debug!(
            action = %event.action,
            category = %event.category,
            label = event.label.as_deref(),
            value = event.value,
            "event emitted"
        );
    }

    /// Send a page configuration call to every backend, with the same
    /// isolation as [`emit`](Self::emit).
    pub fn configure(&self, id: &str, page_path: &str) {
        for backend in &self.backends {
            if let Err(e) = backend.configure(id, page_path) {
                tracing::warn!(backend = backend.name(), page_path, "configure failed: {e:#}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rosetrack_common::event::category;

    use super::*;
    use crate::backend::mock::{FailingBackend, Recorded, RecordingBackend};

    #[test]
    fn emit_without_backends_is_a_noop() {
        let emitter = EventEmitter::default();
        emitter.emit(&Event::new("page_view", category::NAVIGATION));
        assert_eq!(emitter.backend_count(), 0);
    }

    #[test]
    fn emit_reaches_every_backend() {
        let a = Arc::new(RecordingBackend::new());
        let b = Arc::new(RecordingBackend::new());
        let emitter = EventEmitter::new(vec![a.clone(), b.clone()]);
        emitter.emit(&Event::new("click", "CTA").with_label("https://wa.me/1"));
        assert_eq!(a.event_names(), vec!["click"]);
        assert_eq!(b.event_names(), vec!["click"]);
        assert_eq!(
            a.events()[0].1.event_label.as_deref(),
            Some("https://wa.me/1")
        );
    }

    #[test]
    fn failing_backend_does_not_block_later_ones() {
        let failing = Arc::new(FailingBackend::new());
        let ok = Arc::new(RecordingBackend::new());
        let emitter = EventEmitter::new(vec![failing.clone(), ok.clone()]);
        emitter.emit(&Event::new("scroll_depth", category::ENGAGEMENT));
        assert_eq!(failing.attempts(), 1);
        assert_eq!(ok.event_names(), vec!["scroll_depth"]);
    }

    #[test]
    fn configure_isolates_failures() {
        let failing = Arc::new(FailingBackend::new());
        let ok = Arc::new(RecordingBackend::new());
        let mut emitter = EventEmitter::default();
        emitter.register(failing.clone());
        emitter.register(ok.clone());
        emitter.configure("G-TEST", "/about");
        assert_eq!(failing.attempts(), 1);
        assert_eq!(
            ok.calls(),
            vec![Recorded::Configure {
                id: "G-TEST".to_string(),
                page_path: "/about".to_string(),
            }]
        );
    }
}
