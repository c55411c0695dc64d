//! Command-line parsing and validation helpers.

mod defaults;
#[cfg(test)]
mod tests;
mod validation;

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::dsp::MfccConfig;
use crate::pipeline::PipelineConfig;

pub use defaults::{
    DEFAULT_CHANNEL_CAPACITY, DEFAULT_EMA_ALPHA, DEFAULT_FRAME_LEN,
    DEFAULT_INFERENCE_INTERVAL_MS, DEFAULT_LOW_FREQ, DEFAULT_MEL_BANDS, DEFAULT_MFCC_COEFFICIENTS,
    DEFAULT_MODEL_FILE, DEFAULT_SAMPLE_RATE, DEFAULT_SILENCE_RMS_THRESHOLD, MODEL_DIR,
};

/// CLI options for the emovox readout. Validated values feed the pipeline
/// directly.
#[derive(Debug, Parser, Clone)]
#[command(about = "Live microphone emotion classification", version)]
pub struct AppConfig {
    /// Preferred audio input device name
    #[arg(long = "input-device")]
    pub input_device: Option<String>,

    /// Print detected audio input devices and exit
    #[arg(long = "list-input-devices", default_value_t = false)]
    pub list_input_devices: bool,

    /// Path to the classifier weight file (JSON); discovered under models/
    /// when omitted
    #[arg(long = "model", env = "EMOVOX_MODEL")]
    pub model_path: Option<PathBuf>,

    /// Sample rate the feature extractor and model were built for (Hz)
    #[arg(long = "sample-rate", default_value_t = DEFAULT_SAMPLE_RATE)]
    pub sample_rate: u32,

    /// Samples per analysis frame
    #[arg(long = "frame-len", default_value_t = DEFAULT_FRAME_LEN)]
    pub frame_len: usize,

    /// Minimum spacing between classified frames (milliseconds)
    #[arg(long = "inference-interval-ms", default_value_t = DEFAULT_INFERENCE_INTERVAL_MS)]
    pub inference_interval_ms: u64,

    /// Frames whose RMS falls below this read as silence
    #[arg(long = "silence-rms-threshold", default_value_t = DEFAULT_SILENCE_RMS_THRESHOLD)]
    pub silence_rms_threshold: f32,

    /// Exponential smoothing weight for fresh predictions, in (0, 1]
    #[arg(long = "ema-alpha", default_value_t = DEFAULT_EMA_ALPHA)]
    pub ema_alpha: f32,

    /// Mel filterbank size
    #[arg(long = "mel-bands", default_value_t = DEFAULT_MEL_BANDS)]
    pub mel_bands: usize,

    /// Cepstral coefficients kept per frame
    #[arg(long = "mfcc-coefficients", default_value_t = DEFAULT_MFCC_COEFFICIENTS)]
    pub mfcc_coefficients: usize,

    /// Lower mel filterbank edge (Hz)
    #[arg(long = "low-freq", default_value_t = DEFAULT_LOW_FREQ)]
    pub low_freq: f64,

    /// Upper mel filterbank edge (Hz); defaults to Nyquist
    #[arg(long = "high-freq")]
    pub high_freq: Option<f64>,

    /// Capture channel capacity; frames arriving while it is full are
    /// dropped rather than queued
    #[arg(long = "channel-capacity", default_value_t = DEFAULT_CHANNEL_CAPACITY)]
    pub channel_capacity: usize,

    /// Enable JSON trace logging
    #[arg(long = "logs", env = "EMOVOX_LOGS", default_value_t = false)]
    pub logs: bool,
}

impl AppConfig {
    /// Snapshot the MFCC front-end settings for the extractor.
    pub fn mfcc_config(&self) -> MfccConfig {
        MfccConfig {
            sample_rate: self.sample_rate,
            frame_len: self.frame_len,
            mel_bands: self.mel_bands,
            coefficients: self.mfcc_coefficients,
            low_freq: self.low_freq,
            high_freq: self.high_freq,
        }
    }

    /// Snapshot the per-frame pipeline settings.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            inference_interval: Duration::from_millis(self.inference_interval_ms),
            silence_rms_threshold: self.silence_rms_threshold,
            ema_alpha: self.ema_alpha,
        }
    }
}
