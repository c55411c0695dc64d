//! Emotion categories and the classifier boundary.

mod dense;

pub use dense::DenseModel;

use crate::error::Result;

/// Fixed category list. The declaration order defines the index layout of
/// every score vector for the lifetime of the process.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Emotion {
    Angry,
    Happy,
    Sad,
    Neutral,
}

impl Emotion {
    pub const ALL: [Emotion; 4] = [Emotion::Angry, Emotion::Happy, Emotion::Sad, Emotion::Neutral];
    pub const COUNT: usize = Self::ALL.len();

    pub fn label(self) -> &'static str {
        match self {
            Emotion::Angry => "Angry",
            Emotion::Happy => "Happy",
            Emotion::Sad => "Sad",
            Emotion::Neutral => "Neutral",
        }
    }

    /// Presentation color, passed through untouched to whatever renders the
    /// result.
    pub fn color_hex(self) -> &'static str {
        match self {
            Emotion::Angry => "#e74c3c",
            Emotion::Happy => "#f1c40f",
            Emotion::Sad => "#3498db",
            Emotion::Neutral => "#95a5a6",
        }
    }

    pub fn from_index(index: usize) -> Option<Emotion> {
        Self::ALL.get(index).copied()
    }
}

/// Top category plus its smoothed confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub emotion: Emotion,
    pub confidence: f32,
}

/// Boundary to the trained model: a fixed-length feature vector in, one raw
/// score per category out.
///
/// Implementations must not fail for well-formed input of the expected
/// length; wrong-length input is an invariant violation reported as
/// `Error::InvalidInput`. Scores need not sum to one — downstream smoothing
/// never assumes a probability simplex.
pub trait Classifier: Send {
    fn predict(&self, features: &[f32]) -> Result<Vec<f32>>;

    fn name(&self) -> &'static str {
        "classifier"
    }
}
