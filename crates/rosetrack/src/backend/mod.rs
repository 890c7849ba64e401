pub mod console;
pub mod facebook;
pub mod gtag;
pub mod mock;

use std::sync::{Arc, Mutex, PoisonError};

use rosetrack_common::EventParams;
use serde_json::Value;

pub use console::ConsoleBackend;
pub use facebook::FacebookPixel;
pub use gtag::GtagBackend;

/// An analytics backend able to receive page configuration and named events.
///
/// Backends are chosen once at startup; a backend whose script is not loaded
/// is simply never registered.
pub trait Backend: Send + Sync {
    /// Short identifier used in diagnostics.
    fn name(&self) -> &'static str;

    /// Point the backend at a property id for the given page path.
    fn configure(&self, id: &str, page_path: &str) -> anyhow::Result<()>;

    fn event(&self, name: &str, params: &EventParams) -> anyhow::Result<()>;
}

/// A conversion-specific channel (ad conversion tracking, retargeting pixels).
pub trait ConversionChannel: Send + Sync {
    fn name(&self) -> &'static str;

    fn conversion(&self, name: &str) -> anyhow::Result<()>;
}

/// Shared buffer of JSON commands awaiting the page-side script.
///
/// Mirrors the `dataLayer` array a tag-manager snippet reads from: adapters
/// push commands, the hosting page drains them into the real script. Clones
/// share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    inner: Arc<Mutex<Vec<Value>>>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one command.
    ///
    /// # Errors
    ///
    /// Returns an error if a previous writer panicked while holding the buffer.
    pub fn push(&self, command: Value) -> anyhow::Result<()> {
        self.inner
            .lock()
            .map_err(|_| anyhow::anyhow!("command queue poisoned"))?
            .push(command);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the pending commands, oldest first.
    pub fn snapshot(&self) -> Vec<Value> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Take every pending command, leaving the queue empty.
    pub fn drain(&self) -> Vec<Value> {
        std::mem::take(&mut *self.inner.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Pending commands as a JSON array, ready to inline into a page.
    pub fn to_json(&self) -> String {
        Value::Array(self.snapshot()).to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn clones_share_the_buffer() {
        let queue = CommandQueue::new();
        let handle = queue.clone();
        handle.push(json!(["js"])).unwrap();
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn drain_empties_the_queue() {
        let queue = CommandQueue::new();
        queue.push(json!(["event", "a"])).unwrap();
        queue.push(json!(["event", "b"])).unwrap();
        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0][1], "a");
        assert!(queue.is_empty());
    }

    #[test]
    fn to_json_renders_array() {
        let queue = CommandQueue::new();
        queue.push(json!(["track", "order"])).unwrap();
        assert_eq!(queue.to_json(), r#"[["track","order"]]"#);
        assert_eq!(queue.len(), 1, "to_json must not consume commands");
    }
}
