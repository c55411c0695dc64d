//! Per-frame orchestration: gate, silence check, feature extraction, model
//! inference, temporal smoothing, decision.

mod decision;
mod gate;
mod smoother;

pub use decision::top_emotion;
pub use gate::FrameGate;
pub use smoother::TemporalSmoother;

use crate::audio::SilenceDetector;
use crate::classify::{Classifier, Decision, Emotion};
use crate::dsp::MfccExtractor;
use crate::error::{Error, Result};
use std::time::{Duration, Instant};

/// Tunables owned by the pipeline itself; the MFCC front-end carries its
/// own configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Minimum spacing between admitted frames.
    pub inference_interval: Duration,
    /// Frames with RMS below this short-circuit to silence.
    pub silence_rms_threshold: f32,
    /// EMA weight for fresh predictions, in (0, 1].
    pub ema_alpha: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            inference_interval: Duration::from_millis(150),
            silence_rms_threshold: 0.01,
            ema_alpha: 0.3,
        }
    }
}

/// One emitted result per admitted frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Frame energy fell below the silence threshold; the smoothing state
    /// was not touched.
    Silence,
    /// No classifier is loaded yet; distinct from both silence and any
    /// decision so stale results never masquerade as fresh ones.
    NotReady,
    /// Voiced frame classified. `scores` snapshots the smoothed vector in
    /// category order for bar-style rendering.
    Decision { decision: Decision, scores: Vec<f32> },
}

/// Counters reported when a session winds down.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineMetrics {
    pub frames_seen: usize,
    pub frames_admitted: usize,
    pub frames_silent: usize,
    pub frames_classified: usize,
    pub frames_errored: usize,
}

impl PipelineMetrics {
    /// One-line summary in `key=value|...` form for log scraping.
    pub fn summary(&self) -> String {
        format!(
            "pipeline_metrics|frames_seen={}|frames_admitted={}|frames_silent={}|frames_classified={}|frames_errored={}",
            self.frames_seen,
            self.frames_admitted,
            self.frames_silent,
            self.frames_classified,
            self.frames_errored
        )
    }
}

/// Owns every piece of sequentially-dependent pipeline state: the gate's
/// last-admission timestamp and the smoother's running vector. Exactly one
/// logical thread may drive it; the session worker enforces that by owning
/// the controller outright.
pub struct PipelineController {
    gate: FrameGate,
    silence: SilenceDetector,
    extractor: MfccExtractor,
    classifier: Option<Box<dyn Classifier>>,
    smoother: TemporalSmoother,
    metrics: PipelineMetrics,
}

impl PipelineController {
    pub fn new(
        cfg: &PipelineConfig,
        extractor: MfccExtractor,
        classifier: Option<Box<dyn Classifier>>,
    ) -> Self {
        Self {
            gate: FrameGate::new(cfg.inference_interval),
            silence: SilenceDetector::new(cfg.silence_rms_threshold),
            extractor,
            classifier,
            smoother: TemporalSmoother::new(cfg.ema_alpha, Emotion::COUNT),
            metrics: PipelineMetrics::default(),
        }
    }

    /// Attach a model after construction. Smoothing state carries over, so a
    /// late-loaded model resumes from whatever the stream accumulated.
    pub fn set_classifier(&mut self, classifier: Box<dyn Classifier>) {
        self.classifier = Some(classifier);
    }

    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }

    pub fn smoothed_scores(&self) -> &[f32] {
        self.smoother.scores()
    }

    pub fn frame_len(&self) -> usize {
        self.extractor.config().frame_len
    }

    pub fn sample_rate(&self) -> u32 {
        self.extractor.config().sample_rate
    }

    /// Runs one frame through the pipeline. `Ok(None)` means the gate
    /// dropped it; otherwise exactly one outcome is produced. A per-frame
    /// error leaves the smoothing state unchanged so the caller can log it
    /// and keep the stream alive.
    pub fn process_frame(&mut self, frame: &[f32], now: Instant) -> Result<Option<Outcome>> {
        self.metrics.frames_seen += 1;
        if !self.gate.admit(now) {
            return Ok(None);
        }
        self.metrics.frames_admitted += 1;

        if self.silence.is_silent(frame) {
            self.metrics.frames_silent += 1;
            return Ok(Some(Outcome::Silence));
        }

        let Some(classifier) = self.classifier.as_ref() else {
            return Ok(Some(Outcome::NotReady));
        };

        let features = match self.extractor.extract(frame) {
            Ok(features) => features,
            Err(err) => {
                self.metrics.frames_errored += 1;
                return Err(err);
            }
        };
        let raw = match classifier.predict(&features) {
            Ok(raw) => raw,
            Err(err) => {
                self.metrics.frames_errored += 1;
                return Err(err);
            }
        };
        if raw.len() != Emotion::COUNT {
            self.metrics.frames_errored += 1;
            return Err(Error::InvalidInput(format!(
                "classifier '{}' returned {} scores for {} categories",
                classifier.name(),
                raw.len(),
                Emotion::COUNT
            )));
        }

        let scores = self.smoother.update(&raw).to_vec();
        let decision = top_emotion(&scores);
        self.metrics.frames_classified += 1;
        Ok(Some(Outcome::Decision { decision, scores }))
    }
}

/// Drives raw PCM through a controller at a simulated cadence, no microphone
/// required. Trailing samples shorter than one frame are discarded, matching
/// the capture side, which only ever delivers whole frames.
pub fn run_offline(
    controller: &mut PipelineController,
    samples: &[f32],
    frame_period: Duration,
) -> Result<Vec<Outcome>> {
    let frame_len = controller.frame_len();
    let mut outcomes = Vec::new();
    let mut clock = Instant::now();
    for chunk in samples.chunks_exact(frame_len) {
        if let Some(outcome) = controller.process_frame(chunk, clock)? {
            outcomes.push(outcome);
        }
        clock += frame_period;
    }
    Ok(outcomes)
}
