//! Lock-free live input level shared between the worker and the UI.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Latest frame RMS, readable from any thread without locking. The f32 is
/// stored through its bit pattern in an `AtomicU32`.
#[derive(Clone, Debug)]
pub struct LiveMeter {
    level_bits: Arc<AtomicU32>,
}

impl LiveMeter {
    pub fn new() -> Self {
        Self {
            level_bits: Arc::new(AtomicU32::new(0.0f32.to_bits())),
        }
    }

    pub fn set(&self, rms: f32) {
        self.level_bits.store(rms.to_bits(), Ordering::Relaxed);
    }

    pub fn level(&self) -> f32 {
        f32::from_bits(self.level_bits.load(Ordering::Relaxed))
    }
}

impl Default for LiveMeter {
    fn default() -> Self {
        Self::new()
    }
}

/// Root-mean-square energy of a frame; 0.0 for an empty slice.
pub(crate) fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let energy: f32 = samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32;
    energy.sqrt()
}
