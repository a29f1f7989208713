// Headless rendering: the same block processor the audio callback runs,
// fed from a WAV file (or silence) and written out to a WAV file.

use std::path::PathBuf;

use crate::audio::{Diagnostics, FrameSink, InputFrame, OutputFrame, Processor, wav};
use crate::sequencer::ControlFrame;
use crate::shared::NUM_STEPS;

use super::config::EngineConfig;

pub const DEFAULT_SECONDS: f64 = 4.0;
pub const DEFAULT_TEMPO: f32 = 120.0;

#[derive(Clone, Debug, PartialEq)]
pub struct RenderOptions {
    pub output: PathBuf,
    pub input: Option<PathBuf>,
    pub seconds: f64,
    pub pattern: [bool; NUM_STEPS],
    pub tempo_bpm: f32,
}

impl RenderOptions {
    pub fn new(output: PathBuf) -> Self {
        Self {
            output,
            input: None,
            seconds: DEFAULT_SECONDS,
            pattern: [false; NUM_STEPS],
            tempo_bpm: DEFAULT_TEMPO,
        }
    }
}

// 8 chars of 0/1, step 0 first
pub fn parse_pattern(bits: &str) -> anyhow::Result<[bool; NUM_STEPS]> {
    let chars: Vec<char> = bits.chars().collect();
    anyhow::ensure!(
        chars.len() == NUM_STEPS,
        "pattern must have {} steps, got {:?}",
        NUM_STEPS,
        bits
    );
    let mut pattern = [false; NUM_STEPS];
    for (slot, c) in pattern.iter_mut().zip(chars) {
        *slot = match c {
            '1' => true,
            '0' => false,
            other => anyhow::bail!("pattern may only contain 0 and 1, got {:?}", other),
        };
    }
    Ok(pattern)
}

pub fn render(config: &EngineConfig, options: &RenderOptions) -> anyhow::Result<Diagnostics> {
    anyhow::ensure!(
        options.seconds.is_finite() && options.seconds > 0.0,
        "render length must be positive, got {}",
        options.seconds
    );

    let input = match &options.input {
        Some(path) => wav::load_input(path, config.sample_rate)?,
        None => Vec::new(),
    };
    let n_frames = (options.seconds * config.sample_rate as f64).round() as usize;

    let (frames, diagnostics) = render_frames(config, &input, n_frames, &options.pattern, options.tempo_bpm);
    wav::write_output(&options.output, &frames, config.sample_rate, &config.output)?;

    log::info!(
        "rendered {} frames to {} ({})",
        frames.len(),
        options.output.display(),
        diagnostics.summary()
    );
    Ok(diagnostics)
}

// Control frames that type the pattern in on the front panel, then flip to
// view mode so the knobs stop editing.
fn pattern_entry(pattern: &[bool; NUM_STEPS], tempo_knob: f32) -> Vec<ControlFrame> {
    let base = ControlFrame { tempo_knob, pitch_knob: 0.5, ..ControlFrame::default() };
    let mut frames = vec![base];
    let mut cursor = 0i32;
    for (i, _) in pattern.iter().enumerate().filter(|(_, on)| **on) {
        frames.push(ControlFrame {
            encoder_delta: i as i32 - cursor,
            activate: true,
            ..base
        });
        cursor = i as i32;
    }
    // the toggle is applied before the encoder, so homing needs its own block
    frames.push(ControlFrame { encoder_delta: -cursor, ..base });
    frames.push(ControlFrame { mode_toggle: true, ..base });
    frames
}

fn tempo_to_knob(config: &EngineConfig, bpm: f32) -> f32 {
    let span = config.max_tempo - config.min_tempo;
    if span <= 0.0 {
        return 0.0;
    }
    ((bpm - config.min_tempo) / span).clamp(0.0, 1.0)
}

// input shorter than the render is padded with silence
pub fn render_frames(
    config: &EngineConfig,
    input: &[InputFrame],
    n_frames: usize,
    pattern: &[bool; NUM_STEPS],
    tempo_bpm: f32,
) -> (Vec<OutputFrame>, Diagnostics) {
    let block_size = config.block_size.max(1) as usize;
    let mut processor = Processor::new(config);
    let mut entry = pattern_entry(pattern, tempo_to_knob(config, tempo_bpm)).into_iter();

    let mut out = vec![OutputFrame::zero(); n_frames];
    let mut block_in = vec![InputFrame::default(); block_size];

    for (b, block_out) in out.chunks_mut(block_size).enumerate() {
        let start = b * block_size;
        let n = block_out.len();
        for (i, slot) in block_in[..n].iter_mut().enumerate() {
            *slot = input.get(start + i).copied().unwrap_or_default();
        }

        let controls = entry.next().unwrap_or_default();
        let mut sink = FrameSink::new(block_out);
        processor.process_block(&controls, &block_in[..n], &mut sink);
    }

    (out, *processor.diagnostics())
}
