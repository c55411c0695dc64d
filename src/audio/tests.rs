use super::dispatch::{downmix_into, FrameDispatcher};
use super::meter::rms;
use super::resample::{convert_frame_to_target, fit_frame_length, resample_linear};
use super::{LiveMeter, SilenceDetector};
use crossbeam_channel::bounded;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn downmixes_stereo_by_averaging() {
    let mut buf = Vec::new();
    let samples = [1.0f32, -1.0, 0.5, 0.5];
    downmix_into(&mut buf, &samples, 2, |sample| sample);
    assert_eq!(buf, vec![0.0, 0.5]);
}

#[test]
fn preserves_mono_input() {
    let mut buf = Vec::new();
    let samples = [0.1f32, 0.2, 0.3];
    downmix_into(&mut buf, &samples, 1, |sample| sample);
    assert_eq!(buf, samples);
}

#[test]
fn dispatcher_emits_fixed_size_frames() {
    let (sender, receiver) = bounded(8);
    let dropped = Arc::new(AtomicUsize::new(0));
    let mut dispatcher = FrameDispatcher::new(4, sender, dropped.clone());

    let samples: Vec<f32> = (0..10).map(|i| i as f32).collect();
    dispatcher.push(&samples, 1, |sample| sample);

    assert_eq!(receiver.try_recv().unwrap(), vec![0.0, 1.0, 2.0, 3.0]);
    assert_eq!(receiver.try_recv().unwrap(), vec![4.0, 5.0, 6.0, 7.0]);
    assert!(receiver.try_recv().is_err(), "partial frame must stay pending");
    assert_eq!(dropped.load(Ordering::Relaxed), 0);
}

#[test]
fn dispatcher_drops_frames_when_channel_is_full() {
    let (sender, receiver) = bounded(1);
    let dropped = Arc::new(AtomicUsize::new(0));
    let mut dispatcher = FrameDispatcher::new(2, sender, dropped.clone());

    let samples = [0.0f32; 8];
    dispatcher.push(&samples, 1, |sample| sample);

    // Four frames produced, one slot: three dropped, none blocked.
    assert_eq!(dropped.load(Ordering::Relaxed), 3);
    assert!(receiver.try_recv().is_ok());
    assert!(receiver.try_recv().is_err());
}

#[test]
fn resample_linear_halves_length_at_half_ratio() {
    let input = vec![0.0f32, 1.0, 2.0, 3.0];
    let result = resample_linear(&input, 0.5);
    assert_eq!(result.len(), 2);
    assert!((result[0] - 0.0).abs() < 1e-6);
}

#[test]
fn resample_linear_is_identity_at_unit_ratio() {
    let input = vec![0.25f32, -0.5, 0.75];
    assert_eq!(resample_linear(&input, 1.0), input);
}

#[test]
fn fit_frame_length_holds_last_sample() {
    assert_eq!(
        fit_frame_length(vec![1.0, 2.0], 4),
        vec![1.0, 2.0, 2.0, 2.0]
    );
    assert_eq!(fit_frame_length(vec![1.0, 2.0, 3.0], 2), vec![1.0, 2.0]);
}

#[test]
fn convert_frame_passes_through_matching_rates() {
    let frame = vec![0.1f32, 0.2, 0.3, 0.4];
    let out = convert_frame_to_target(frame.clone(), 16_000, 16_000, 4);
    assert_eq!(out, frame);
}

#[test]
fn convert_frame_resamples_to_exact_target_length() {
    let frame: Vec<f32> = (0..96).map(|i| (i as f32 * 0.05).sin()).collect();
    let out = convert_frame_to_target(frame, 48_000, 16_000, 32);
    assert_eq!(out.len(), 32);
}

#[test]
fn rms_of_silence_is_zero_and_full_scale_is_one() {
    assert_eq!(rms(&[]), 0.0);
    assert_eq!(rms(&[0.0; 64]), 0.0);
    let square = [1.0f32, -1.0, 1.0, -1.0];
    assert!((rms(&square) - 1.0).abs() < 1e-6);
}

#[test]
fn silence_detector_thresholds_on_rms() {
    let detector = SilenceDetector::new(0.01);
    assert!(detector.is_silent(&[0.0; 1024]));
    assert!(detector.is_silent(&[0.005; 1024]));
    assert!(!detector.is_silent(&[0.5; 1024]));
}

#[test]
fn live_meter_roundtrips_levels() {
    let meter = LiveMeter::new();
    assert_eq!(meter.level(), 0.0);
    meter.set(0.125);
    assert_eq!(meter.level(), 0.125);
}
