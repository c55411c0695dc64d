//! Sample-rate conversion between device chunks and pipeline frames.

/// Linear-interpolation resample by `ratio` (output rate over input rate).
pub(crate) fn resample_linear(input: &[f32], ratio: f64) -> Vec<f32> {
    if input.is_empty() || ratio <= 0.0 {
        return Vec::new();
    }
    let out_len = ((input.len() as f64) * ratio).round().max(1.0) as usize;
    let step = 1.0 / ratio;
    let mut out = Vec::with_capacity(out_len);
    for i in 0..out_len {
        let pos = i as f64 * step;
        let index = pos.floor() as usize;
        let frac = (pos - index as f64) as f32;
        let a = input[index.min(input.len() - 1)];
        let b = input[(index + 1).min(input.len() - 1)];
        out.push(a + (b - a) * frac);
    }
    out
}

/// Fit `samples` to exactly `target_len`: trim overflow, hold the final
/// sample over shortfall. Deviation is rounding-sized (a sample or two),
/// never bulk zero-fill, so frame statistics stay honest.
pub(crate) fn fit_frame_length(mut samples: Vec<f32>, target_len: usize) -> Vec<f32> {
    if samples.len() > target_len {
        samples.truncate(target_len);
    } else if samples.len() < target_len {
        let hold = samples.last().copied().unwrap_or(0.0);
        samples.resize(target_len, hold);
    }
    samples
}

/// Convert one device-rate chunk into a pipeline frame of `target_len`
/// samples at `target_rate`. Matching rates bypass interpolation entirely.
pub(crate) fn convert_frame_to_target(
    frame: Vec<f32>,
    device_rate: u32,
    target_rate: u32,
    target_len: usize,
) -> Vec<f32> {
    if frame.is_empty() || device_rate == 0 || target_rate == 0 {
        return Vec::new();
    }
    if device_rate == target_rate {
        return fit_frame_length(frame, target_len);
    }
    let ratio = f64::from(target_rate) / f64::from(device_rate);
    fit_frame_length(resample_linear(&frame, ratio), target_len)
}
