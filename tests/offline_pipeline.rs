//! End-to-end offline runs through the public API, no microphone required.

use emovox::classify::{Classifier, Emotion};
use emovox::dsp::{MfccConfig, MfccExtractor};
use emovox::error::Result;
use emovox::pipeline::{run_offline, Outcome, PipelineConfig, PipelineController};
use std::f32::consts::PI;
use std::time::Duration;

const FRAME_LEN: usize = 1024;

struct ConstClassifier {
    scores: Vec<f32>,
}

impl Classifier for ConstClassifier {
    fn predict(&self, _features: &[f32]) -> Result<Vec<f32>> {
        Ok(self.scores.clone())
    }

    fn name(&self) -> &'static str {
        "const"
    }
}

fn controller(scores: Vec<f32>) -> PipelineController {
    let extractor =
        MfccExtractor::new(MfccConfig::default()).expect("default MFCC config should build");
    PipelineController::new(
        &PipelineConfig::default(),
        extractor,
        Some(Box::new(ConstClassifier { scores })),
    )
}

fn voiced_frame() -> Vec<f32> {
    (0..FRAME_LEN)
        .map(|i| (2.0 * PI * 440.0 * i as f32 / 16_000.0).sin() * 0.5)
        .collect()
}

#[test]
fn silent_then_voiced_stream_matches_expected_outcomes() {
    let mut controller = controller(vec![0.1, 0.8, 0.05, 0.05]);

    let mut samples = vec![0.0; FRAME_LEN];
    samples.extend(voiced_frame());

    let outcomes = run_offline(&mut controller, &samples, Duration::from_millis(150))
        .expect("offline run should succeed");

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0], Outcome::Silence);

    let Outcome::Decision { decision, scores } = &outcomes[1] else {
        panic!("expected a decision, got {:?}", outcomes[1]);
    };
    assert_eq!(decision.emotion, Emotion::Happy);
    assert!((decision.confidence - 0.24).abs() < 1e-6);

    let expected = [0.03, 0.24, 0.015, 0.015];
    for (value, want) in scores.iter().zip(expected) {
        assert!((value - want).abs() < 1e-6, "got {scores:?}");
    }
}

#[test]
fn fast_cadence_is_rate_limited_by_the_gate() {
    let mut controller = controller(vec![0.25; 4]);
    let samples: Vec<f32> = std::iter::repeat(voiced_frame())
        .take(6)
        .flatten()
        .collect();

    // 50 ms cadence against the default 150 ms interval.
    let outcomes = run_offline(&mut controller, &samples, Duration::from_millis(50))
        .expect("offline run should succeed");
    assert_eq!(outcomes.len(), 2);
    assert_eq!(controller.metrics().frames_seen, 6);
    assert_eq!(controller.metrics().frames_admitted, 2);
}

#[test]
fn trailing_partial_frame_is_discarded() {
    let mut controller = controller(vec![0.25; 4]);
    let mut samples = voiced_frame();
    samples.extend(&voiced_frame()[..100]);

    let outcomes = run_offline(&mut controller, &samples, Duration::from_millis(150))
        .expect("offline run should succeed");
    assert_eq!(outcomes.len(), 1);
    assert_eq!(controller.metrics().frames_seen, 1);
}
