pub mod file;
pub mod logging;
pub mod mock;

use rosetrack_common::PixelRequestRecord;

pub use file::JsonLinesSink;
pub use logging::TracingSink;

/// Destination for tracking-pixel records.
#[async_trait::async_trait]
pub trait TelemetrySink: Send + Sync {
    /// Write one record. Called once per pixel request, before the response.
    async fn record(&self, record: &PixelRequestRecord) -> anyhow::Result<()>;
}
