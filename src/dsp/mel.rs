//! Mel-scale conversions, analysis window, and triangular filterbank.

use std::f64::consts::PI;

/// Hamming window of length `n`.
pub(crate) fn hamming_window(n: usize) -> Vec<f64> {
    if n <= 1 {
        return vec![1.0; n];
    }
    (0..n)
        .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / (n - 1) as f64).cos())
        .collect()
}

pub(crate) fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

pub(crate) fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10.0_f64.powf(mel / 2595.0) - 1.0)
}

/// One triangular filter: weights for a contiguous run of spectrum bins
/// starting at `first_bin`. Only the nonzero span is stored.
pub(crate) struct MelFilter {
    first_bin: usize,
    weights: Vec<f64>,
}

impl MelFilter {
    /// Weighted sum of the power-spectrum bins this filter covers. Filters
    /// bumped past the spectrum end (extreme edge frequencies) read as empty.
    pub(crate) fn apply(&self, power: &[f64]) -> f64 {
        let span = power.get(self.first_bin..).unwrap_or(&[]);
        self.weights.iter().zip(span).map(|(w, p)| w * p).sum()
    }
}

/// Triangular filters with edges equally spaced on the mel scale between
/// `low_freq` and `high_freq`.
///
/// Requires `bands + 2 <= fft_size / 2 + 1` so every filter keeps at least
/// one bin after collision bumping; the extractor validates this.
pub(crate) fn build_filter_bank(
    bands: usize,
    fft_size: usize,
    sample_rate: u32,
    low_freq: f64,
    high_freq: f64,
) -> Vec<MelFilter> {
    let half_fft = fft_size / 2 + 1;
    let low_mel = hz_to_mel(low_freq);
    let high_mel = hz_to_mel(high_freq);
    let step = (high_mel - low_mel) / (bands + 1) as f64;

    // bands + 2 edge points, mapped onto spectrum bin indices.
    let mut bins: Vec<usize> = (0..bands + 2)
        .map(|i| {
            let hz = mel_to_hz(low_mel + i as f64 * step);
            let bin = (hz * fft_size as f64 / f64::from(sample_rate)).round() as usize;
            bin.min(half_fft - 1)
        })
        .collect();

    // Adjacent edges can collapse onto one bin at small frame sizes; keep
    // every filter at least one bin wide.
    for i in 1..bins.len() {
        if bins[i] <= bins[i - 1] {
            bins[i] = bins[i - 1] + 1;
        }
    }

    let mut bank = Vec::with_capacity(bands);
    for m in 0..bands {
        let (left, center, right) = (bins[m], bins[m + 1], bins[m + 2]);
        let mut weights = Vec::with_capacity(right - left + 1);
        for k in left..center.min(half_fft) {
            weights.push((k - left) as f64 / (center - left) as f64);
        }
        for k in center..=right.min(half_fft - 1) {
            weights.push((right - k) as f64 / (right - center) as f64);
        }
        bank.push(MelFilter {
            first_bin: left,
            weights,
        });
    }
    bank
}
