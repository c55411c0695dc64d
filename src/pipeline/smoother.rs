//! Exponential temporal smoothing of score vectors.

/// Running exponentially-weighted average of classifier scores.
///
/// Higher `alpha` weights recent predictions more, trading stability for
/// responsiveness. The state vector is allocated once and mutated only
/// through [`TemporalSmoother::update`], so gated and silent frames leave it
/// untouched and smoothing resumes where it left off when voiced audio
/// returns. Never renormalizes: if raw scores do not sum to one, neither
/// does the state.
#[derive(Debug)]
pub struct TemporalSmoother {
    alpha: f32,
    scores: Vec<f32>,
}

impl TemporalSmoother {
    pub fn new(alpha: f32, categories: usize) -> Self {
        Self {
            alpha,
            scores: vec![0.0; categories],
        }
    }

    /// Folds one raw score vector into the running state and returns it.
    /// `raw` must match the state length; the controller guards this before
    /// calling.
    pub fn update(&mut self, raw: &[f32]) -> &[f32] {
        debug_assert_eq!(raw.len(), self.scores.len());
        for (state, &fresh) in self.scores.iter_mut().zip(raw) {
            *state = self.alpha * fresh + (1.0 - self.alpha) * *state;
        }
        &self.scores
    }

    pub fn scores(&self) -> &[f32] {
        &self.scores
    }
}
