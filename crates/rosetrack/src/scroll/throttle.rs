use std::time::{Duration, Instant};

/// Leading-edge throttle: the first call in a window fires, the rest of the
/// window is dropped. Nothing is queued for later.
#[derive(Debug, Clone)]
pub struct Throttle {
    window: Duration,
    last_fired: Option<Instant>,
}

impl Throttle {
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            last_fired: None,
        }
    }

    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Returns `true` and starts a new window if `now` is outside the
    /// current one.
    pub fn try_fire(&mut self, now: Instant) -> bool {
        let cooling_down = self
            .last_fired
            .is_some_and(|last| now.saturating_duration_since(last) < self.window);
        if cooling_down {
            return false;
        }
        self.last_fired = Some(now);
        true
    }
}
