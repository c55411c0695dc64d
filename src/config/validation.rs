use super::defaults::{DEFAULT_MODEL_FILE, MODEL_DIR};
use super::AppConfig;
use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let mut config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values and normalize the model path. Everything here fails
    /// before any audio is consumed.
    pub fn validate(&mut self) -> Result<()> {
        if !(8_000..=96_000).contains(&self.sample_rate) {
            bail!(
                "--sample-rate must be between 8000 and 96000 Hz, got {}",
                self.sample_rate
            );
        }
        if !(64..=16_384).contains(&self.frame_len) {
            bail!(
                "--frame-len must be between 64 and 16384 samples, got {}",
                self.frame_len
            );
        }
        if !(10..=5_000).contains(&self.inference_interval_ms) {
            bail!(
                "--inference-interval-ms must be between 10 and 5000, got {}",
                self.inference_interval_ms
            );
        }
        if !(0.0..=1.0).contains(&self.silence_rms_threshold) {
            bail!(
                "--silence-rms-threshold must be between 0.0 and 1.0, got {}",
                self.silence_rms_threshold
            );
        }
        if !(self.ema_alpha > 0.0 && self.ema_alpha <= 1.0) {
            bail!("--ema-alpha must be within (0.0, 1.0], got {}", self.ema_alpha);
        }
        if !(4..=128).contains(&self.mel_bands) {
            bail!("--mel-bands must be between 4 and 128, got {}", self.mel_bands);
        }
        if self.mel_bands + 2 > self.frame_len / 2 + 1 {
            bail!(
                "--mel-bands {} does not fit a {}-sample frame",
                self.mel_bands,
                self.frame_len
            );
        }
        if self.mfcc_coefficients == 0 || self.mfcc_coefficients > self.mel_bands {
            bail!(
                "--mfcc-coefficients must be between 1 and --mel-bands ({}), got {}",
                self.mel_bands,
                self.mfcc_coefficients
            );
        }
        let nyquist = f64::from(self.sample_rate) / 2.0;
        if self.low_freq < 0.0 || self.low_freq >= nyquist {
            bail!(
                "--low-freq must be within [0, {nyquist}) Hz, got {}",
                self.low_freq
            );
        }
        if let Some(high) = self.high_freq {
            if high <= self.low_freq || high > nyquist {
                bail!("--high-freq must be within (--low-freq, {nyquist}] Hz, got {high}");
            }
        }
        if !(1..=64).contains(&self.channel_capacity) {
            bail!(
                "--channel-capacity must be between 1 and 64, got {}",
                self.channel_capacity
            );
        }

        // Device listing needs no model.
        if self.list_input_devices {
            return Ok(());
        }

        if self.model_path.is_none() {
            self.model_path = discover_default_model();
        }
        let Some(model) = &mut self.model_path else {
            bail!("--model is required (no weight file found under {MODEL_DIR}/)");
        };
        if !model.exists() {
            bail!("model path '{}' does not exist", model.display());
        }
        // Store a canonical absolute path so later cwd changes cannot break it.
        let canonical = model
            .canonicalize()
            .with_context(|| format!("failed to canonicalize model path '{}'", model.display()))?;
        *model = canonical;

        Ok(())
    }
}

/// Look for the conventional weight file so the binary works out of the box.
fn discover_default_model() -> Option<PathBuf> {
    let candidate = Path::new(MODEL_DIR).join(DEFAULT_MODEL_FILE);
    if candidate.exists() {
        Some(candidate)
    } else {
        None
    }
}
