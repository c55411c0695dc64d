//! Inference rate limiting.

use std::time::{Duration, Instant};

/// Admits at most one frame per interval, with spacing measured between
/// admitted frames: a burst arriving inside one interval yields exactly one
/// admit. Content-blind.
#[derive(Debug)]
pub struct FrameGate {
    interval: Duration,
    last_accepted: Option<Instant>,
}

impl FrameGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_accepted: None,
        }
    }

    /// True when the pipeline should run for a frame arriving at `now`. The
    /// acceptance timestamp advances before the rest of the pipeline runs,
    /// so a slow downstream stage cannot widen the admission window.
    pub fn admit(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_accepted {
            if now.duration_since(last) < self.interval {
                return false;
            }
        }
        self.last_accepted = Some(now);
        true
    }
}
