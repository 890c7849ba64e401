use serde_json::json;

use super::{CommandQueue, ConversionChannel};

/// Meta pixel adapter. Conversion-only: ordinary events never reach it.
pub struct FacebookPixel {
    pixel_id: String,
    queue: CommandQueue,
}

impl FacebookPixel {
    pub fn new(pixel_id: impl Into<String>, queue: CommandQueue) -> Self {
        Self {
            pixel_id: pixel_id.into(),
            queue,
        }
    }

    /// Queue the `fbq('init', id)` call. Done once when the page sets up.
    ///
    /// # Errors
    ///
    /// Returns an error if the command queue is poisoned.
    pub fn init(&self) -> anyhow::Result<()> {
        self.queue.push(json!(["init", self.pixel_id]))
    }
}

impl ConversionChannel for FacebookPixel {
    fn name(&self) -> &'static str {
        "facebook-pixel"
    }

    fn conversion(&self, name: &str) -> anyhow::Result<()> {
        self.queue.push(json!(["track", name]))
    }
}
