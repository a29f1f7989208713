use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};

use super::frame::{InputFrame, OutputFrame};
use super::processor::Processor;
use super::sink::FrameSink;
use crate::audio_api::{AudioCommand, EngineSnapshot};
use crate::pipeline::config::EngineConfig;
use crate::sequencer::ControlAccumulator;

const INPUT_RING: usize = 8192; // hard cap so we wont malloc in audio callback
const SNAPSHOTS_PER_SECOND: u32 = 60;
const GATE_SWING: f32 = 0.95; // gate on an audio jack: full swing both ways
const CV_FULL_SCALE: f32 = 5.0;

// lives inside the output callback
pub struct Engine {
    processor: Processor,
    controls: ControlAccumulator,
    block_size: usize,
    sample_rate: u32,

    input_rx: Option<Receiver<Vec<InputFrame>>>,
    snapshot_tx: Option<Sender<EngineSnapshot>>,
    input_ring: VecDeque<InputFrame>,

    // scratch, sized once
    input_block: Vec<InputFrame>,
    output_block: Vec<OutputFrame>,

    snapshot_interval: usize,
    until_snapshot: usize,
}

impl Engine {
    pub fn new(config: &EngineConfig) -> Self {
        let block_size = config.block_size.max(1) as usize;
        let snapshot_interval = (config.sample_rate / SNAPSHOTS_PER_SECOND).max(1) as usize;
        Self {
            processor: Processor::new(config),
            controls: ControlAccumulator::default(),
            block_size,
            sample_rate: config.sample_rate,
            input_rx: None,
            snapshot_tx: None,
            input_ring: VecDeque::with_capacity(INPUT_RING),
            input_block: vec![InputFrame::default(); block_size],
            output_block: vec![OutputFrame::zero(); block_size],
            snapshot_interval,
            until_snapshot: 0,
        }
    }

    pub fn set_input_rx(&mut self, rx: Receiver<Vec<InputFrame>>) {
        self.input_rx = Some(rx);
    }

    pub fn set_snapshot_tx(&mut self, tx: Sender<EngineSnapshot>) {
        self.snapshot_tx = Some(tx);
    }

    pub fn handle_cmd(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::SetTempoKnob(v) => self.controls.set_tempo_knob(v),
            AudioCommand::SetPitchKnob(v) => self.controls.set_pitch_knob(v),
            AudioCommand::Encoder(delta) => self.controls.turn_encoder(delta),
            AudioCommand::ToggleMode => self.controls.press_mode(),
            AudioCommand::ToggleStep => self.controls.press_activate(),
        }
    }

    // input chunks -> ring; the oldest frames go first when it is full
    pub fn drain_input(&mut self) {
        let Some(rx) = &self.input_rx else { return };
        while let Ok(chunk) = rx.try_recv() {
            for frame in chunk {
                if self.input_ring.len() == INPUT_RING {
                    self.input_ring.pop_front();
                    self.processor.diagnostics_mut().overflowed_input_samples += 1;
                }
                self.input_ring.push_back(frame);
            }
        }
    }

    // ch0 gate, ch1 audio, ch2 cv/5V; mono devices just get the audio
    pub fn render_block(&mut self, data: &mut [f32], channels: usize) {
        if channels == 0 {
            return;
        }
        let started = Instant::now();
        let n_frames = data.len() / channels;

        let mut done = 0;
        while done < n_frames {
            let n = (n_frames - done).min(self.block_size);
            self.fill_input(n);

            let controls = self.controls.take();
            let mut sink = FrameSink::new(&mut self.output_block[..n]);
            self.processor.process_block(&controls, &self.input_block[..n], &mut sink);

            let out = &mut data[done * channels..(done + n) * channels];
            for (frame, slots) in self.output_block[..n].iter().zip(out.chunks_exact_mut(channels)) {
                write_device_frame(frame, slots);
            }
            done += n;
        }

        // leftovers from a buffer that isn't a whole number of frames
        data[n_frames * channels..].fill(0.0);

        let budget = Duration::from_secs_f64(n_frames as f64 / self.sample_rate as f64);
        self.processor.diagnostics_mut().record_callback(started.elapsed(), budget);
        self.publish(n_frames);
    }

    fn fill_input(&mut self, n: usize) {
        let live = self.input_rx.is_some();
        for slot in &mut self.input_block[..n] {
            *slot = match self.input_ring.pop_front() {
                Some(frame) => frame,
                None => {
                    if live {
                        self.processor.diagnostics_mut().starved_input_samples += 1;
                    }
                    InputFrame::default()
                }
            };
        }
    }

    fn publish(&mut self, frames: usize) {
        let Some(tx) = &self.snapshot_tx else { return };
        if self.until_snapshot > frames {
            self.until_snapshot -= frames;
            return;
        }
        self.until_snapshot = self.snapshot_interval;
        let _ = tx.try_send(self.processor.snapshot());
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        self.processor.snapshot()
    }
}

fn write_device_frame(frame: &OutputFrame, slots: &mut [f32]) {
    if slots.len() == 1 {
        slots[0] = frame.audio;
        return;
    }
    for (ch, slot) in slots.iter_mut().enumerate() {
        *slot = match ch {
            0 => if frame.gate { GATE_SWING } else { -GATE_SWING },
            1 => frame.audio,
            2 => (frame.cv / CV_FULL_SCALE).clamp(-1.0, 1.0),
            _ => 0.0,
        };
    }
}
