use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use rosetrack_common::EventParams;

use super::{Backend, ConversionChannel};

/// A call observed by [`RecordingBackend`] or [`RecordingChannel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    Configure { id: String, page_path: String },
    Event { name: String, params: EventParams },
    Conversion { name: String },
}

/// In-memory backend for tests. Keeps every call in order.
#[derive(Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<Recorded>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::expect_used)]
    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    /// Only the events, as `(name, params)` pairs.
    pub fn events(&self) -> Vec<(String, EventParams)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Recorded::Event { name, params } => Some((name, params)),
                _ => None,
            })
            .collect()
    }

    /// Only the event names.
    pub fn event_names(&self) -> Vec<String> {
        self.events().into_iter().map(|(name, _)| name).collect()
    }
}

#[allow(clippy::expect_used)]
impl Backend for RecordingBackend {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn configure(&self, id: &str, page_path: &str) -> anyhow::Result<()> {
        self.calls
            .lock()
            .expect("lock poisoned")
            .push(Recorded::Configure {
                id: id.to_string(),
                page_path: page_path.to_string(),
            });
        Ok(())
    }

    fn event(&self, name: &str, params: &EventParams) -> anyhow::Result<()> {
        self.calls.lock().expect("lock poisoned").push(Recorded::Event {
            name: name.to_string(),
            params: params.clone(),
        });
        Ok(())
    }
}

/// In-memory conversion channel for tests.
#[derive(Default)]
pub struct RecordingChannel {
    conversions: Mutex<Vec<String>>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::expect_used)]
    pub fn conversions(&self) -> Vec<String> {
        self.conversions.lock().expect("lock poisoned").clone()
    }
}

#[allow(clippy::expect_used)]
impl ConversionChannel for RecordingChannel {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn conversion(&self, name: &str) -> anyhow::Result<()> {
        self.conversions
            .lock()
            .expect("lock poisoned")
            .push(name.to_string());
        Ok(())
    }
}

/// Backend and channel that rejects every call. Counts attempts.
#[derive(Default)]
pub struct FailingBackend {
    attempts: AtomicUsize,
}

impl FailingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }

    fn fail(&self) -> anyhow::Result<()> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        anyhow::bail!("backend unreachable")
    }
}

impl Backend for FailingBackend {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn configure(&self, _id: &str, _page_path: &str) -> anyhow::Result<()> {
        self.fail()
    }

    fn event(&self, _name: &str, _params: &EventParams) -> anyhow::Result<()> {
        self.fail()
    }
}

impl ConversionChannel for FailingBackend {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn conversion(&self, _name: &str) -> anyhow::Result<()> {
        self.fail()
    }
}
