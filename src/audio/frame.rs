// One sample of everything coming in from the jacks
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputFrame {
    pub audio: f32,
    pub gate: bool,
}

pub const GATE_IN_THRESHOLD: f32 = 0.5;

impl InputFrame {
    // one interleaved frame: channel 0 is audio, channel 1 (if any) the gate
    pub fn from_channels(channels: &[f32]) -> Self {
        Self {
            audio: channels.first().copied().unwrap_or(0.0),
            gate: channels.get(1).is_some_and(|&g| g > GATE_IN_THRESHOLD),
        }
    }
}

// One sample of everything going out
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OutputFrame {
    pub gate: bool,
    pub cv: f32, // volts
    pub audio: f32,
}

impl OutputFrame {
    pub fn zero() -> Self { // just giving `default` a better name for clarity
        Self::default()
    }
}
