pub use crate::audio::Diagnostics;
use crate::sequencer::{Mode, StepSlot};
use crate::shared::{Indicators, NUM_STEPS};

#[derive(Clone, Debug, PartialEq)]
pub enum AudioCommand {
    // Knobs are absolute positions; the engine folds everything that
    // arrives between two blocks into that block's control frame.
    SetTempoKnob(f32),
    SetPitchKnob(f32),
    Encoder(i32),
    ToggleMode,
    ToggleStep,
}

// What the audio thread reports back, a few dozen times a second.
#[derive(Clone, Debug)]
pub struct EngineSnapshot {
    pub mode: Mode,
    pub steps: [StepSlot; NUM_STEPS],
    pub current_step: usize,
    pub edit_cursor: usize,
    pub tempo_bpm: f32,
    pub gate: bool,
    pub cv_volts: f32,
    pub tracked_hz: f32,
    pub indicators: Indicators,
    pub diagnostics: Diagnostics,
}
