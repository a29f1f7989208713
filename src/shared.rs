// The front panel, as laid out in the TUI:
//
//   [ / ]         //  TempoKnob(-0.05 / +0.05)   knob 1
//   - / =         //  PitchKnob(-0.05 / +0.05)   knob 2
//   , / .         //  EncoderTurn(-1 / +1)       step through the sequence
//   Tab           //  EncoderPress               EDIT <-> VIEW
//   Space         //  ButtonPress                toggle the selected step
//   Esc           //  Quit
//
// Two RGB LEDs: the step LED shows the selected step's color in EDIT and
// the playing step's color in VIEW; the status LED is green when that step
// is active (EDIT) or the gate is latched (VIEW).

use crate::sequencer::{Mode, StepSlot};

pub const NUM_STEPS: usize = 8;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const OFF: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const RED: Rgb = Rgb::new(1.0, 0.0, 0.0);
    pub const GREEN: Rgb = Rgb::new(0.0, 1.0, 0.0);
    pub const BLUE: Rgb = Rgb::new(0.0, 0.0, 1.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
    pub const PURPLE: Rgb = Rgb::new(1.0, 0.0, 1.0);
    pub const ORANGE: Rgb = Rgb::new(1.0, 0.8, 0.0);
    pub const YELLOW: Rgb = Rgb::new(1.0, 1.0, 0.0);
    pub const CYAN: Rgb = Rgb::new(0.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn to_u8(self) -> (u8, u8, u8) {
        let c = |x: f32| (x.clamp(0.0, 1.0) * 255.0).round() as u8;
        (c(self.r), c(self.g), c(self.b))
    }
}

pub const STEP_COLORS: [Rgb; NUM_STEPS] = [
    Rgb::RED,
    Rgb::GREEN,
    Rgb::BLUE,
    Rgb::WHITE,
    Rgb::PURPLE,
    Rgb::ORANGE,
    Rgb::YELLOW,
    Rgb::CYAN,
];

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Indicators {
    pub step: Rgb,
    pub status: Rgb,
    pub gate_in: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    TempoKnob(f32), // relative turn
    PitchKnob(f32),
    EncoderTurn(i32),
    EncoderPress,
    ButtonPress,
    Quit,
}

// Everything the TUI draws in one frame.
#[derive(Clone, Debug)]
pub struct DisplayState {
    pub mode: Mode,
    pub steps: [StepSlot; NUM_STEPS],
    pub current_step: usize,
    pub edit_cursor: usize,
    pub tempo_bpm: f32,
    pub gate: bool,
    pub cv_volts: f32,
    pub tracked_hz: f32,
    pub indicators: Indicators,
    pub tempo_knob: f32,
    pub pitch_knob: f32,
    pub overruns: u64,
    pub starved: u64,
}
