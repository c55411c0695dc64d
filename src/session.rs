//! Background worker that owns the pipeline and feeds the presentation side.
//!
//! One thread is the only consumer of the capture channel and runs each
//! frame's full pipeline to completion before taking the next, so the gate's
//! timing state and the smoother's running vector are only ever touched in
//! arrival order. Keeps the UI responsive while inference runs.

use crate::audio::{convert_frame_to_target, rms, FrameStream, LiveMeter, Recorder};
use crate::pipeline::{Outcome, PipelineController};
use crossbeam_channel::RecvTimeoutError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const DEVICE_RETRY: Duration = Duration::from_secs(1);
const RECV_WAIT: Duration = Duration::from_millis(50);

/// Messages sent from the worker to the presentation side.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Outcome(Outcome),
    /// Capture failed; the worker retries acquisition until stopped and
    /// processes no frames meanwhile.
    DeviceLost(String),
}

/// Handle the UI uses to receive events and stop the worker.
pub struct ClassifySession {
    pub receiver: mpsc::Receiver<SessionEvent>,
    pub handle: Option<thread::JoinHandle<()>>,
    stop_flag: Arc<AtomicBool>,
}

impl ClassifySession {
    /// Ask the worker to wind down. It drops the capture stream, discards
    /// any in-flight frame, and logs its metrics.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }
}

/// Spawn the worker thread. The CPAL stream is built inside the thread
/// because stream handles are not portable across threads on every host.
pub fn start_session(
    recorder: Recorder,
    controller: PipelineController,
    channel_capacity: usize,
    meter: Option<LiveMeter>,
) -> ClassifySession {
    let (tx, rx) = mpsc::channel();
    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop = stop_flag.clone();

    let handle = thread::spawn(move || {
        run_worker(recorder, controller, channel_capacity, meter, stop, tx);
    });

    ClassifySession {
        receiver: rx,
        handle: Some(handle),
        stop_flag,
    }
}

enum CaptureEnd {
    Stopped,
    UiGone,
    Disconnected,
}

fn run_worker(
    recorder: Recorder,
    mut controller: PipelineController,
    channel_capacity: usize,
    meter: Option<LiveMeter>,
    stop_flag: Arc<AtomicBool>,
    tx: mpsc::Sender<SessionEvent>,
) {
    let frame_len = controller.frame_len();
    let target_rate = controller.sample_rate();
    let mut dropped_total = 0usize;

    while !stop_flag.load(Ordering::Relaxed) {
        let stream = match recorder.open_stream(frame_len, target_rate, channel_capacity) {
            Ok(stream) => stream,
            Err(err) => {
                warn!(error = %err, "failed to open capture stream");
                if tx.send(SessionEvent::DeviceLost(err.to_string())).is_err() {
                    break;
                }
                thread::sleep(DEVICE_RETRY);
                continue;
            }
        };
        debug!(
            device = %recorder.device_name(),
            device_rate = stream.device_rate,
            "capture stream started"
        );

        let end = pump_stream(
            &stream,
            &mut controller,
            target_rate,
            frame_len,
            &meter,
            &stop_flag,
            &tx,
        );
        dropped_total += stream.dropped.load(Ordering::Relaxed);
        drop(stream);

        match end {
            CaptureEnd::Stopped | CaptureEnd::UiGone => break,
            CaptureEnd::Disconnected => {
                let _ = tx.send(SessionEvent::DeviceLost(
                    "capture stream disconnected".to_string(),
                ));
                thread::sleep(DEVICE_RETRY);
            }
        }
    }

    debug!(
        summary = %controller.metrics().summary(),
        frames_dropped = dropped_total,
        "session finished"
    );
}

/// Consume frames until the stream dies or the session is stopped.
fn pump_stream(
    stream: &FrameStream,
    controller: &mut PipelineController,
    target_rate: u32,
    frame_len: usize,
    meter: &Option<LiveMeter>,
    stop_flag: &AtomicBool,
    tx: &mpsc::Sender<SessionEvent>,
) -> CaptureEnd {
    loop {
        if stop_flag.load(Ordering::Relaxed) {
            return CaptureEnd::Stopped;
        }
        match stream.receiver.recv_timeout(RECV_WAIT) {
            Ok(chunk) => {
                let frame =
                    convert_frame_to_target(chunk, stream.device_rate, target_rate, frame_len);
                if frame.is_empty() {
                    continue;
                }
                if let Some(meter) = meter {
                    meter.set(rms(&frame));
                }
                match controller.process_frame(&frame, Instant::now()) {
                    Ok(Some(outcome)) => {
                        if tx.send(SessionEvent::Outcome(outcome)).is_err() {
                            return CaptureEnd::UiGone;
                        }
                    }
                    Ok(None) => {}
                    // One bad frame never halts the stream.
                    Err(err) => warn!(error = %err, "frame skipped"),
                }
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                warn!("capture stream disconnected");
                return CaptureEnd::Disconnected;
            }
        }
    }
}
