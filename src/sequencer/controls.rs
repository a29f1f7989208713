use crate::shared::NUM_STEPS;

// one block's worth of panel input; knobs are absolute, the rest is since last block
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlFrame {
    pub tempo_knob: f32,
    pub pitch_knob: f32,
    pub encoder_delta: i32,
    pub mode_toggle: bool,
    pub activate: bool,
}

impl Default for ControlFrame {
    fn default() -> Self {
        Self {
            tempo_knob: 0.5,
            pitch_knob: 0.5, // root
            encoder_delta: 0,
            mode_toggle: false,
            activate: false,
        }
    }
}

// step index moved by a signed amount, wrapping both ways
pub fn wrap_index(index: usize, delta: i32) -> usize {
    (index as i64 + delta as i64).rem_euclid(NUM_STEPS as i64) as usize
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

// knobs persist, deltas and edges are handed out once by take()
#[derive(Clone, Debug, Default)]
pub struct ControlAccumulator {
    pending: ControlFrame,
}

impl ControlAccumulator {
    pub fn set_tempo_knob(&mut self, value: f32) {
        if value.is_finite() {
            self.pending.tempo_knob = value.clamp(0.0, 1.0);
        }
    }

    pub fn set_pitch_knob(&mut self, value: f32) {
        if value.is_finite() {
            self.pending.pitch_knob = value.clamp(0.0, 1.0);
        }
    }

    pub fn turn_encoder(&mut self, delta: i32) {
        self.pending.encoder_delta = self.pending.encoder_delta.saturating_add(delta);
    }

    // two presses within one block cancel out
    pub fn press_mode(&mut self) {
        self.pending.mode_toggle = !self.pending.mode_toggle;
    }

    pub fn press_activate(&mut self) {
        self.pending.activate = !self.pending.activate;
    }

    pub fn take(&mut self) -> ControlFrame {
        let frame = self.pending;
        self.pending.encoder_delta = 0;
        self.pending.mode_toggle = false;
        self.pending.activate = false;
        frame
    }
}
