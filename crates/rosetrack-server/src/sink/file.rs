use std::path::{Path, PathBuf};

use rosetrack_common::PixelRequestRecord;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::TelemetrySink;

/// Appends one JSON object per line to a file. Writes are serialized so
/// concurrent requests never interleave within a line.
pub struct JsonLinesSink {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl TelemetrySink for JsonLinesSink {
    async fn record(&self, record: &PixelRequestRecord) -> anyhow::Result<()> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        let _guard = self.lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| anyhow::anyhow!("cannot open {}: {e}", self.path.display()))?;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }
}
