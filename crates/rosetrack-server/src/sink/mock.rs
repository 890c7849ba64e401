use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use rosetrack_common::PixelRequestRecord;

use super::TelemetrySink;

/// In-memory sink for tests. Keeps every record in arrival order.
#[derive(Default)]
pub struct InMemorySink {
    records: Mutex<Vec<PixelRequestRecord>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::expect_used)]
    pub fn records(&self) -> Vec<PixelRequestRecord> {
        self.records.lock().expect("lock poisoned").clone()
    }
}

#[allow(clippy::expect_used)]
#[async_trait::async_trait]
impl TelemetrySink for InMemorySink {
    async fn record(&self, record: &PixelRequestRecord) -> anyhow::Result<()> {
        self.records
            .lock()
            .expect("lock poisoned")
            .push(record.clone());
        Ok(())
    }
}

/// Sink that rejects every write. Counts attempts.
#[derive(Default)]
pub struct FailingSink {
    attempts: AtomicUsize,
}

impl FailingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl TelemetrySink for FailingSink {
    async fn record(&self, _record: &PixelRequestRecord) -> anyhow::Result<()> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        anyhow::bail!("telemetry sink unavailable")
    }
}
