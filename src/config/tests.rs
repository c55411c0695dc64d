use super::AppConfig;
use clap::Parser;

/// Base config with device listing enabled so validation skips the model
/// path requirement.
fn base(extra: &[&str]) -> AppConfig {
    let mut args = vec!["emovox", "--list-input-devices"];
    args.extend_from_slice(extra);
    AppConfig::parse_from(args)
}

#[test]
fn defaults_are_valid() {
    let mut config = base(&[]);
    config.validate().expect("defaults should validate");
    assert_eq!(config.sample_rate, 16_000);
    assert_eq!(config.frame_len, 1024);
    assert_eq!(config.inference_interval_ms, 150);
    assert_eq!(config.mfcc_coefficients, 13);
}

#[test]
fn rejects_out_of_range_sample_rate() {
    let mut config = base(&["--sample-rate", "4000"]);
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("--sample-rate"));
}

#[test]
fn rejects_tiny_frames() {
    let mut config = base(&["--frame-len", "16"]);
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("--frame-len"));
}

#[test]
fn rejects_zero_alpha_and_accepts_one() {
    let mut config = base(&["--ema-alpha", "0.0"]);
    assert!(config.validate().is_err());

    let mut config = base(&["--ema-alpha", "1.0"]);
    assert!(config.validate().is_ok());
}

#[test]
fn rejects_more_coefficients_than_bands() {
    let mut config = base(&["--mel-bands", "10", "--mfcc-coefficients", "13"]);
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("--mfcc-coefficients"));
}

#[test]
fn rejects_bands_that_overflow_the_frame() {
    let mut config = base(&["--frame-len", "64", "--mel-bands", "64"]);
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("--mel-bands"));
}

#[test]
fn rejects_high_freq_past_nyquist() {
    let mut config = base(&["--high-freq", "12000"]);
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("--high-freq"));
}

#[test]
fn rejects_silence_threshold_above_one() {
    let mut config = base(&["--silence-rms-threshold", "1.5"]);
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("--silence-rms-threshold"));
}

#[test]
fn missing_model_is_fatal_outside_device_listing() {
    let mut config = AppConfig::parse_from(["emovox", "--model", "/no/such/model.json"]);
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn snapshots_carry_validated_values() {
    let mut config = base(&["--inference-interval-ms", "200", "--ema-alpha", "0.5"]);
    config.validate().unwrap();

    let pipeline = config.pipeline_config();
    assert_eq!(pipeline.inference_interval.as_millis(), 200);
    assert!((pipeline.ema_alpha - 0.5).abs() < 1e-6);

    let mfcc = config.mfcc_config();
    assert_eq!(mfcc.sample_rate, 16_000);
    assert_eq!(mfcc.coefficients, 13);
}
