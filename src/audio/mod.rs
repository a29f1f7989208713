use anyhow::Context;
use crossbeam_channel::{Receiver, Sender};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::audio_api::{AudioCommand, EngineSnapshot};
use crate::pipeline::config::EngineConfig;

mod diagnostics;
mod engine;
mod frame;
mod processor;
mod sink;
pub mod wav;

pub use diagnostics::Diagnostics;
pub use frame::{InputFrame, OutputFrame};
pub use processor::Processor;
pub use sink::{FrameSink, OutputSink};

use engine::Engine;

pub struct AudioHandle {
    tx: Sender<AudioCommand>,
    snapshot_rx: Receiver<EngineSnapshot>,
    _output_stream: cpal::Stream,
    _input_stream: Option<cpal::Stream>, // None when no input jack available
}

impl AudioHandle {
    pub fn send(&self, cmd: AudioCommand) {
        let _ = self.tx.try_send(cmd);
    }

    // only the newest snapshot matters, older ones are dropped
    pub fn poll_snapshot(&self) -> Option<EngineSnapshot> {
        self.snapshot_rx.try_iter().last()
    }
}

pub fn start_audio(engine_config: &EngineConfig) -> anyhow::Result<AudioHandle> {
    let (tx, rx) = crossbeam_channel::bounded::<AudioCommand>(1024);

    let host = cpal::default_host();
    let device = host.default_output_device().context("no default output device")?;
    let supported = device.default_output_config().context("no default output config")?;

    let mut config: cpal::StreamConfig = supported.config();
    config.sample_rate = engine_config.sample_rate;
    let channels = config.channels as usize;

    let (input_tx, input_rx) = crossbeam_channel::bounded::<Vec<InputFrame>>(2048);
    let (snapshot_tx, snapshot_rx) = crossbeam_channel::bounded::<EngineSnapshot>(8);

    match supported.sample_format() {
        cpal::SampleFormat::F32 => {
            let mut engine = Engine::new(engine_config);
            engine.set_snapshot_tx(snapshot_tx);

            let input_stream = try_build_input_stream(&host, engine_config.sample_rate, input_tx);
            if input_stream.is_some() {
                engine.set_input_rx(input_rx);
            }

            let output_stream = build_output_stream_f32(&device, &config, rx, engine, channels)?;
            output_stream.play().context("failed to play output stream")?;
            log::info!(
                "output stream running: {} Hz, {} channels, block {}",
                engine_config.sample_rate,
                channels,
                engine_config.block_size
            );

            Ok(AudioHandle {
                tx,
                snapshot_rx,
                _output_stream: output_stream,
                _input_stream: input_stream,
            })
        }
        other => anyhow::bail!("unsupported sample format {other:?} (only f32 supported for now)"),
    }
}

// ── Output stream ─────────────────────────────────────────────────

fn build_output_stream_f32(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    rx: Receiver<AudioCommand>,
    mut engine: Engine,
    channels: usize,
) -> anyhow::Result<cpal::Stream> {
    let err_fn = |err| log::error!("audio output stream error: {err}");

    let stream = device.build_output_stream(
        config,
        move |data: &mut [f32], _info| {
            while let Ok(cmd) = rx.try_recv() {
                engine.handle_cmd(cmd);
            }
            engine.drain_input();
            engine.render_block(data, channels);
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}

fn try_build_input_stream(
    host: &cpal::Host,
    target_sample_rate: cpal::SampleRate,
    tx: Sender<Vec<InputFrame>>,
) -> Option<cpal::Stream> {
    let device = match host.default_input_device() {
        Some(d) => d,
        None => {
            log::warn!("no default input device, pitch tracking and gate-in will see silence");
            return None;
        }
    };

    let supported = match device.default_input_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("no usable input config: {e}");
            return None;
        }
    };
    if supported.sample_format() != cpal::SampleFormat::F32 {
        log::warn!("input device is not f32, pitch tracking disabled");
        return None;
    }
    let mut stream_config: cpal::StreamConfig = supported.into();
    stream_config.sample_rate = target_sample_rate;

    let in_channels = (stream_config.channels as usize).max(1);

    let err_fn = |err| log::error!("audio input stream error: {err}");

    let stream = match device.build_input_stream(
        &stream_config,
        move |data: &[f32], _info: &cpal::InputCallbackInfo| {
            // same jack layout as an input wav: audio on 0, gate on 1
            let frames: Vec<InputFrame> = data
                .chunks_exact(in_channels)
                .map(InputFrame::from_channels)
                .collect();
            let _ = tx.try_send(frames);
        },
        err_fn,
        None,
    ) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("could not build input stream: {e}");
            return None;
        }
    };

    if let Err(e) = stream.play() {
        log::warn!("could not start input stream: {e}");
        return None;
    }

    Some(stream)
}
