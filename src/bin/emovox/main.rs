//! Live microphone emotion readout.

mod ui;

use anyhow::{Context, Result};
use emovox::audio::{LiveMeter, Recorder};
use emovox::classify::DenseModel;
use emovox::config::AppConfig;
use emovox::dsp::MfccExtractor;
use emovox::pipeline::PipelineController;
use emovox::{start_session, telemetry};

fn main() -> Result<()> {
    let config = AppConfig::parse_args()?;
    telemetry::init_tracing(&config);

    if config.list_input_devices {
        for name in Recorder::list_devices()? {
            println!("{name}");
        }
        return Ok(());
    }

    let model_path = config
        .model_path
        .clone()
        .context("validated config always carries a model path")?;

    // Everything that can be misconfigured fails here, before any audio.
    let extractor = MfccExtractor::new(config.mfcc_config())
        .context("feature extractor configuration rejected")?;
    let model = DenseModel::load(&model_path, config.mfcc_coefficients)
        .with_context(|| format!("failed to load model '{}'", model_path.display()))?;
    let recorder = Recorder::new(config.input_device.as_deref())?;
    let device_name = recorder.device_name();

    let controller = PipelineController::new(
        &config.pipeline_config(),
        extractor,
        Some(Box::new(model)),
    );
    let meter = LiveMeter::new();
    let mut session = start_session(
        recorder,
        controller,
        config.channel_capacity,
        Some(meter.clone()),
    );

    let result = ui::run(&session, &meter, &device_name);

    session.stop();
    if let Some(handle) = session.handle.take() {
        let _ = handle.join();
    }
    result
}
