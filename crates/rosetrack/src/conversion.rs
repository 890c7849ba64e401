use std::sync::Arc;

use rosetrack_common::Event;
use rosetrack_common::event::category;

use crate::backend::ConversionChannel;
use crate::emitter::EventEmitter;

/// Reports high-value actions through the emitter and every conversion
/// channel.
pub struct ConversionReporter {
    emitter: Arc<EventEmitter>,
    channels: Vec<Arc<dyn ConversionChannel>>,
}

impl ConversionReporter {
    pub fn new(emitter: Arc<EventEmitter>, channels: Vec<Arc<dyn ConversionChannel>>) -> Self {
        Self { emitter, channels }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// The generic `Conversion` event always goes out first; channels are
    /// then notified best-effort, each independently.
    pub fn report_conversion(&self, name: &str) {
        self.emitter.emit(&Event::new(name, category::CONVERSION));
        for channel in &self.channels {
            if let Err(e) = channel.conversion(name) {
                tracing::warn!(channel = channel.name(), name, "conversion dispatch failed: {e:#}");
            }
        }
        tracing::debug!(name, channels = self.channels.len(), "conversion tracked");
    }
}
