use rosetrack_common::PixelRequestRecord;

use super::TelemetrySink;

/// Writes each record as one structured `info` line. The default sink.
pub struct TracingSink;

#[async_trait::async_trait]
impl TelemetrySink for TracingSink {
    async fn record(&self, record: &PixelRequestRecord) -> anyhow::Result<()> {
        tracing::info!(
            target: "rosetrack_server::pixel",
            kind = %record.kind,
            page = %record.page,
            timestamp = %record.timestamp,
            ip = %record.ip,
            user_agent = %record.user_agent,
            referer = %record.referer,
            "{}",
            record.message
        );
        Ok(())
    }
}
