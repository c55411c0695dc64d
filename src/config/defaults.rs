//! Default values for the CLI surface.

pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;
pub const DEFAULT_FRAME_LEN: usize = 1024;
pub const DEFAULT_INFERENCE_INTERVAL_MS: u64 = 150;
pub const DEFAULT_SILENCE_RMS_THRESHOLD: f32 = 0.01;
pub const DEFAULT_EMA_ALPHA: f32 = 0.3;
pub const DEFAULT_MEL_BANDS: usize = 26;
pub const DEFAULT_MFCC_COEFFICIENTS: usize = 13;
pub const DEFAULT_LOW_FREQ: f64 = 20.0;
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1;

/// Directory searched for a weight file when `--model` is omitted.
pub const MODEL_DIR: &str = "models";
pub const DEFAULT_MODEL_FILE: &str = "emotion.json";
