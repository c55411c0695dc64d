//! Winner selection over smoothed scores.

use crate::classify::{Decision, Emotion};

/// Argmax with strict comparison: ties keep the earliest category index.
/// Confidence is the winning smoothed value, reported without normalizing.
pub fn top_emotion(scores: &[f32]) -> Decision {
    debug_assert_eq!(scores.len(), Emotion::COUNT);
    let mut top = 0;
    for (index, &value) in scores.iter().enumerate().skip(1) {
        if value > scores[top] {
            top = index;
        }
    }
    Decision {
        emotion: Emotion::ALL[top],
        confidence: scores[top],
    }
}
