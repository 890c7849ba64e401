//! Scroll-depth milestones, reported once each per logical page.

pub mod clock;
pub mod throttle;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use rosetrack_common::Event;
use rosetrack_common::event::category;

pub use clock::{Clock, ManualClock, SystemClock};
pub use throttle::Throttle;

use crate::emitter::EventEmitter;

/// Percentages reported when nothing else is configured.
pub const DEFAULT_THRESHOLDS: [u8; 4] = [25, 50, 75, 90];

/// Minimum spacing between two evaluated scroll samples.
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(500);

/// Viewport geometry at the moment of a scroll event, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSample {
    pub scroll_offset: f64,
    pub viewport_height: f64,
    pub document_height: f64,
}

impl ScrollSample {
    pub const fn new(scroll_offset: f64, viewport_height: f64, document_height: f64) -> Self {
        Self {
            scroll_offset,
            viewport_height,
            document_height,
        }
    }

    /// Share of the document seen so far, rounded to a whole percent.
    ///
    /// `None` when the document height is zero, negative or not finite, or
    /// when the offsets are not numbers. Overflowing positions saturate.
    #[allow(clippy::cast_possible_truncation)]
    pub fn percent(&self) -> Option<i64> {
        if !self.document_height.is_finite() || self.document_height <= 0.0 {
            return None;
        }
        let pct = ((self.scroll_offset + self.viewport_height) / self.document_height * 100.0)
            .round();
        // float-to-int `as` saturates at the i64 bounds
        (!pct.is_nan()).then_some(pct as i64)
    }
}

/// Emits one `scroll_depth` event per threshold crossed.
///
/// A threshold leaves the pending set the moment it is reported, so it fires
/// at most once until [`reset`](Self::reset). Samples are throttled with a
/// leading-edge window; samples inside the window are dropped.
pub struct ScrollDepthMonitor {
    emitter: Arc<EventEmitter>,
    clock: Arc<dyn Clock>,
    thresholds: BTreeSet<u8>,
    pending: BTreeSet<u8>,
    throttle: Throttle,
}

impl ScrollDepthMonitor {
    pub fn new(
        emitter: Arc<EventEmitter>,
        clock: Arc<dyn Clock>,
        thresholds: &[u8],
        window: Duration,
    ) -> Self {
        let thresholds: BTreeSet<u8> = thresholds.iter().copied().collect();
        Self {
            emitter,
            clock,
            pending: thresholds.clone(),
            thresholds,
            throttle: Throttle::new(window),
        }
    }

    /// Monitor with [`DEFAULT_THRESHOLDS`] and [`DEFAULT_THROTTLE`].
    pub fn with_defaults(emitter: Arc<EventEmitter>, clock: Arc<dyn Clock>) -> Self {
        Self::new(emitter, clock, &DEFAULT_THRESHOLDS, DEFAULT_THROTTLE)
    }

    /// Feed one scroll sample. Returns the thresholds reported by this
    /// sample, ascending; empty when throttled or nothing new was crossed.
    pub fn on_scroll(&mut self, sample: ScrollSample) -> Vec<u8> {
        if !self.throttle.try_fire(self.clock.now()) {
            return Vec::new();
        }
        self.evaluate(sample)
    }

    fn evaluate(&mut self, sample: ScrollSample) -> Vec<u8> {
        let Some(percent) = sample.percent() else {
            tracing::debug!(?sample, "unusable scroll sample");
            return Vec::new();
        };
        let passed: Vec<u8> = self
            .pending
            .iter()
            .copied()
            .filter(|&mark| percent >= i64::from(mark))
            .collect();
        for mark in &passed {
            self.emitter.emit(
                &Event::new("scroll_depth", category::ENGAGEMENT)
                    .with_label(format!("Scrolled {mark}%"))
                    .with_value(i64::from(*mark)),
            );
            self.pending.remove(mark);
        }
        passed
    }

    /// Restore every configured threshold. Call on each in-app navigation.
    pub fn reset(&mut self) {
        self.pending.clone_from(&self.thresholds);
    }

    /// Thresholds not yet reported, ascending.
    pub fn pending(&self) -> Vec<u8> {
        self.pending.iter().copied().collect()
    }
}
