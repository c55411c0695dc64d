//! Mel-frequency cepstral coefficient extraction.
//!
//! One voiced frame in, a fixed-length coefficient vector out: Hamming
//! window, FFT, power spectrum, triangular mel filterbank, log with a floor,
//! DCT-II. Every table is precomputed at startup, so repeated extraction is
//! read-only and bit-for-bit reproducible for identical input.

use crate::dsp::mel::{build_filter_bank, hamming_window, MelFilter};
use crate::error::{Error, Result};
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::f64::consts::PI;
use std::sync::Arc;

/// Filter energies below this are clamped before the log so silent bands
/// stay finite.
const LOG_ENERGY_FLOOR: f64 = 1e-10;

/// Front-end parameters. The paired classifier fixes these at training time;
/// a mismatch beyond what the dimension checks can catch degrades accuracy
/// silently, so they are surfaced as configuration rather than constants.
#[derive(Debug, Clone)]
pub struct MfccConfig {
    pub sample_rate: u32,
    pub frame_len: usize,
    pub mel_bands: usize,
    pub coefficients: usize,
    pub low_freq: f64,
    /// Upper filterbank edge in Hz; `None` means Nyquist.
    pub high_freq: Option<f64>,
}

impl Default for MfccConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            frame_len: 1024,
            mel_bands: 26,
            coefficients: 13,
            low_freq: 20.0,
            high_freq: None,
        }
    }
}

impl MfccConfig {
    pub fn nyquist(&self) -> f64 {
        f64::from(self.sample_rate) / 2.0
    }

    fn resolved_high_freq(&self) -> f64 {
        self.high_freq.unwrap_or_else(|| self.nyquist())
    }
}

/// Converts one audio frame into cepstral coefficients.
pub struct MfccExtractor {
    cfg: MfccConfig,
    window: Vec<f64>,
    filters: Vec<MelFilter>,
    dct_basis: Vec<Vec<f64>>,
    fft: Arc<dyn Fft<f64>>,
}

impl MfccExtractor {
    /// Builds the window, filterbank, DCT basis, and FFT plan for the given
    /// configuration. Fails fast on any parameter the filterbank cannot
    /// honor, so mismatches surface at startup rather than mid-stream.
    pub fn new(cfg: MfccConfig) -> Result<Self> {
        if cfg.sample_rate == 0 {
            return Err(Error::Configuration("sample rate must be nonzero".into()));
        }
        if cfg.frame_len < 2 {
            return Err(Error::Configuration(format!(
                "frame length must be at least 2 samples, got {}",
                cfg.frame_len
            )));
        }
        if cfg.coefficients == 0 || cfg.coefficients > cfg.mel_bands {
            return Err(Error::Configuration(format!(
                "coefficient count must be between 1 and the band count ({}), got {}",
                cfg.mel_bands, cfg.coefficients
            )));
        }
        if cfg.mel_bands + 2 > cfg.frame_len / 2 + 1 {
            return Err(Error::Configuration(format!(
                "{} mel bands do not fit a {}-sample frame",
                cfg.mel_bands, cfg.frame_len
            )));
        }
        let high_freq = cfg.resolved_high_freq();
        if cfg.low_freq < 0.0 || high_freq <= cfg.low_freq || high_freq > cfg.nyquist() {
            return Err(Error::Configuration(format!(
                "filterbank range {}..{} Hz is invalid for a {} Hz sample rate",
                cfg.low_freq, high_freq, cfg.sample_rate
            )));
        }

        let window = hamming_window(cfg.frame_len);
        let filters = build_filter_bank(
            cfg.mel_bands,
            cfg.frame_len,
            cfg.sample_rate,
            cfg.low_freq,
            high_freq,
        );
        let dct_basis = dct2_basis(cfg.coefficients, cfg.mel_bands);
        let fft = FftPlanner::<f64>::new().plan_fft_forward(cfg.frame_len);

        Ok(Self {
            cfg,
            window,
            filters,
            dct_basis,
            fft,
        })
    }

    pub fn config(&self) -> &MfccConfig {
        &self.cfg
    }

    /// Extracts the coefficient vector for one frame.
    ///
    /// A frame whose length differs from the configured one is a capture
    /// misconfiguration and is rejected outright; there is no implicit
    /// truncation or padding because either would shift the output
    /// statistics away from what the classifier was trained on.
    pub fn extract(&self, frame: &[f32]) -> Result<Vec<f32>> {
        if frame.len() != self.cfg.frame_len {
            return Err(Error::Configuration(format!(
                "frame length {} does not match the configured {} samples",
                frame.len(),
                self.cfg.frame_len
            )));
        }

        let mut spectrum: Vec<Complex<f64>> = frame
            .iter()
            .zip(&self.window)
            .map(|(&s, &w)| Complex::new(f64::from(s) * w, 0.0))
            .collect();
        self.fft.process(&mut spectrum);

        // Real input: only the non-negative frequencies carry information.
        let half = self.cfg.frame_len / 2 + 1;
        let power: Vec<f64> = spectrum[..half].iter().map(|c| c.norm_sqr()).collect();

        let log_energies: Vec<f64> = self
            .filters
            .iter()
            .map(|filter| filter.apply(&power).max(LOG_ENERGY_FLOOR).ln())
            .collect();

        let coefficients = self
            .dct_basis
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&log_energies)
                    .map(|(b, e)| b * e)
                    .sum::<f64>() as f32
            })
            .collect();
        Ok(coefficients)
    }
}

/// Orthonormal DCT-II basis: `coefficients` rows over `bands` points.
fn dct2_basis(coefficients: usize, bands: usize) -> Vec<Vec<f64>> {
    let m = bands as f64;
    (0..coefficients)
        .map(|k| {
            let scale = if k == 0 { (1.0 / m).sqrt() } else { (2.0 / m).sqrt() };
            (0..bands)
                .map(|n| scale * (PI * k as f64 * (n as f64 + 0.5) / m).cos())
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI as PI32;

    fn extractor() -> MfccExtractor {
        MfccExtractor::new(MfccConfig::default()).expect("default config should build")
    }

    fn sine_frame(freq: f32, amplitude: f32) -> Vec<f32> {
        (0..1024)
            .map(|i| (2.0 * PI32 * freq * i as f32 / 16_000.0).sin() * amplitude)
            .collect()
    }

    #[test]
    fn output_always_has_thirteen_coefficients() {
        let ex = extractor();
        for frame in [sine_frame(440.0, 0.5), sine_frame(2_000.0, 0.1), vec![0.0; 1024]] {
            assert_eq!(ex.extract(&frame).unwrap().len(), 13);
        }
    }

    #[test]
    fn extraction_is_deterministic() {
        let ex = extractor();
        let frame = sine_frame(440.0, 0.5);
        let first = ex.extract(&frame).unwrap();
        let second = ex.extract(&frame).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn all_zero_frame_stays_finite() {
        let ex = extractor();
        let coefficients = ex.extract(&vec![0.0; 1024]).unwrap();
        for c in coefficients {
            assert!(c.is_finite());
        }
    }

    #[test]
    fn wrong_frame_length_is_a_configuration_error() {
        let ex = extractor();
        let err = ex.extract(&vec![0.0; 512]).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)), "got {err:?}");
    }

    #[test]
    fn distinct_tones_produce_distinct_features() {
        let ex = extractor();
        let low = ex.extract(&sine_frame(300.0, 0.5)).unwrap();
        let high = ex.extract(&sine_frame(3_000.0, 0.5)).unwrap();
        assert_ne!(low, high);
    }

    #[test]
    fn rejects_more_coefficients_than_bands() {
        let cfg = MfccConfig {
            mel_bands: 10,
            coefficients: 13,
            ..MfccConfig::default()
        };
        assert!(matches!(
            MfccExtractor::new(cfg),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn rejects_filterbank_past_nyquist() {
        let cfg = MfccConfig {
            high_freq: Some(12_000.0),
            ..MfccConfig::default()
        };
        assert!(matches!(
            MfccExtractor::new(cfg),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn dct_basis_rows_are_orthonormal() {
        let basis = dct2_basis(13, 26);
        for (i, row_a) in basis.iter().enumerate() {
            for (j, row_b) in basis.iter().enumerate() {
                let dot: f64 = row_a.iter().zip(row_b).map(|(a, b)| a * b).sum();
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((dot - expected).abs() < 1e-9, "rows {i},{j}: {dot}");
            }
        }
    }
}
