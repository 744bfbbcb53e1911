//! Frame timing.

/// Gaps longer than this (ms) are treated as a pause, e.g. a backgrounded tab.
pub const MAX_FRAME_GAP_MS: f64 = 1000.0;

/// Turns animation-frame timestamps into per-frame elapsed time.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_stamp: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `timestamp` (ms) and returns the time since the previous tick.
    ///
    /// Spans over [`MAX_FRAME_GAP_MS`] come back as `0.0` so the momentum step
    /// does not jump after the page was hidden.
    pub fn tick(&mut self, timestamp: f64) -> f64 {
        let span = timestamp - self.last_stamp;
        self.last_stamp = timestamp;
        if span > MAX_FRAME_GAP_MS {
            0.0
        } else {
            span
        }
    }

    pub fn last_stamp(&self) -> f64 {
        self.last_stamp
    }
}
