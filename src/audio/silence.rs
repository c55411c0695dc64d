//! Energy-based silence gating.

use super::meter::rms;

/// Classifies frames as silent or voiced by linear RMS energy. Silent
/// frames short-circuit the pipeline without touching the smoothing state:
/// silence is a pause, not a reset.
#[derive(Debug, Clone, Copy)]
pub struct SilenceDetector {
    threshold: f32,
}

impl SilenceDetector {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn is_silent(&self, samples: &[f32]) -> bool {
        rms(samples) < self.threshold
    }
}
