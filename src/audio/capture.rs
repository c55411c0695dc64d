//! Microphone capture via CPAL.
//!
//! Handles device enumeration and format conversion. Every supported sample
//! type is converted to f32 in the callback so the rest of the pipeline is
//! format-agnostic.

use super::dispatch::FrameDispatcher;
use crate::error::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use crossbeam_channel::{bounded, Receiver};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Audio input device wrapper.
pub struct Recorder {
    device: cpal::Device,
}

impl Recorder {
    /// List microphone names so the CLI can expose a human-friendly selector.
    pub fn list_devices() -> Result<Vec<String>> {
        let host = cpal::default_host();
        let devices = host
            .input_devices()
            .map_err(|err| Error::Device(format!("no input devices available: {err}")))?;
        Ok(devices.filter_map(|device| device.name().ok()).collect())
    }

    /// Create a recorder, optionally forcing a specific device so users can
    /// pick the right microphone when the machine exposes several inputs.
    pub fn new(preferred_device: Option<&str>) -> Result<Self> {
        let host = cpal::default_host();
        let device = match preferred_device {
            Some(name) => {
                let mut devices = host
                    .input_devices()
                    .map_err(|err| Error::Device(format!("no input devices available: {err}")))?;
                devices
                    .find(|d| d.name().map(|n| n == name).unwrap_or(false))
                    .ok_or_else(|| Error::Device(format!("input device '{name}' not found")))?
            }
            None => host.default_input_device().ok_or_else(|| {
                Error::Device(format!(
                    "no default input device available. {}",
                    mic_permission_hint()
                ))
            })?,
        };
        Ok(Self { device })
    }

    /// Name of the active recording device.
    pub fn device_name(&self) -> String {
        self.device
            .name()
            .unwrap_or_else(|_| "Unknown Device".to_string())
    }

    /// Open a continuous input stream delivering device-rate mono chunks
    /// sized so each one resamples to exactly `frame_len` samples at
    /// `target_rate`. Capture stops when the returned handle is dropped.
    pub fn open_stream(
        &self,
        frame_len: usize,
        target_rate: u32,
        channel_capacity: usize,
    ) -> Result<FrameStream> {
        let default_config = self
            .device
            .default_input_config()
            .map_err(|err| Error::Device(format!("failed to query input format: {err}")))?;
        let format = default_config.sample_format();
        let device_config: StreamConfig = default_config.into();
        let device_rate = device_config.sample_rate.0;
        let channels = usize::from(device_config.channels.max(1));

        if device_rate == 0 {
            return Err(Error::Device("device reports a zero sample rate".into()));
        }

        // Chunk at the device rate so one chunk becomes one pipeline frame.
        let device_frame_samples = ((frame_len as u64 * u64::from(device_rate))
            / u64::from(target_rate.max(1)))
        .max(1) as usize;

        let (sender, receiver) = bounded::<Vec<f32>>(channel_capacity.max(1));
        let dropped = Arc::new(AtomicUsize::new(0));
        let dispatcher = Arc::new(Mutex::new(FrameDispatcher::new(
            device_frame_samples,
            sender,
            dropped.clone(),
        )));

        debug!(
            format = ?format,
            device_rate,
            channels,
            device_frame_samples,
            "opening capture stream"
        );

        let err_fn = |err| warn!(error = %err, "audio stream error");
        let stream = match format {
            SampleFormat::F32 => {
                let dispatcher = dispatcher.clone();
                let dropped = dropped.clone();
                self.device.build_input_stream(
                    &device_config,
                    move |data: &[f32], _| {
                        if let Ok(mut pump) = dispatcher.try_lock() {
                            pump.push(data, channels, |sample| sample);
                        } else {
                            dropped.fetch_add(1, Ordering::Relaxed);
                        }
                    },
                    err_fn,
                    None,
                )
            }
            SampleFormat::I16 => {
                let dispatcher = dispatcher.clone();
                let dropped = dropped.clone();
                self.device.build_input_stream(
                    &device_config,
                    move |data: &[i16], _| {
                        if let Ok(mut pump) = dispatcher.try_lock() {
                            pump.push(data, channels, |sample| sample as f32 / 32_768.0);
                        } else {
                            dropped.fetch_add(1, Ordering::Relaxed);
                        }
                    },
                    err_fn,
                    None,
                )
            }
            SampleFormat::U16 => {
                let dispatcher = dispatcher.clone();
                let dropped = dropped.clone();
                self.device.build_input_stream(
                    &device_config,
                    move |data: &[u16], _| {
                        if let Ok(mut pump) = dispatcher.try_lock() {
                            pump.push(data, channels, |sample| {
                                (sample as f32 - 32_768.0) / 32_768.0
                            });
                        } else {
                            dropped.fetch_add(1, Ordering::Relaxed);
                        }
                    },
                    err_fn,
                    None,
                )
            }
            other => {
                return Err(Error::Device(format!("unsupported sample format: {other:?}")))
            }
        }
        .map_err(|err| Error::Device(format!("failed to open input stream: {err}")))?;

        stream
            .play()
            .map_err(|err| Error::Device(format!("failed to start input stream: {err}")))?;

        Ok(FrameStream {
            _stream: stream,
            receiver,
            device_rate,
            dropped,
        })
    }
}

/// Live capture handle: holds the CPAL stream and the frame channel. Drop it
/// to stop capture; in-flight chunks are discarded with it.
pub struct FrameStream {
    _stream: cpal::Stream,
    pub receiver: Receiver<Vec<f32>>,
    pub device_rate: u32,
    pub dropped: Arc<AtomicUsize>,
}

fn mic_permission_hint() -> &'static str {
    #[cfg(target_os = "macos")]
    {
        "macOS: System Settings > Privacy & Security > Microphone (enable your terminal)."
    }
    #[cfg(target_os = "linux")]
    {
        "Linux: check PipeWire/PulseAudio permissions and ensure the device is not muted."
    }
    #[cfg(target_os = "windows")]
    {
        "Windows: Settings > Privacy & Security > Microphone (allow access for your terminal)."
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        "Check OS microphone permissions."
    }
}
