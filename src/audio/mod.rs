//! Capture-side collaborators: microphone input, mono frame dispatch,
//! sample-rate conversion, level metering, and silence detection.
//!
//! Audio is captured via CPAL at whatever rate and channel count the device
//! offers, downmixed to mono, chunked, and resampled so the pipeline only
//! ever sees fixed-length frames at the configured rate.

mod capture;
mod dispatch;
mod meter;
mod resample;
mod silence;
#[cfg(test)]
mod tests;

pub use capture::{FrameStream, Recorder};
pub use meter::LiveMeter;
pub use silence::SilenceDetector;

pub(crate) use meter::rms;
pub(crate) use resample::convert_frame_to_target;
