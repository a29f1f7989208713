use std::f32::consts::TAU;

// basic sine oscillator, same phase-in-radians scheme as the old voices
#[derive(Clone, Copy, Debug)]
pub struct Oscillator {
    sample_rate: f32,
    phase: f32,
    phase_inc: f32, // radians per sample
    amp: f32,
}

impl Oscillator {
    pub fn new(sample_rate: f32, amp: f32) -> Self {
        Self {
            sample_rate,
            phase: 0.0,
            phase_inc: 0.0,
            amp,
        }
    }

    pub fn set_freq(&mut self, freq: f32) {
        self.phase_inc = (TAU * freq) / self.sample_rate;
    }

    #[inline]
    pub fn process(&mut self) -> f32 {
        let out = self.amp * self.phase.sin();
        self.phase += self.phase_inc;
        if self.phase >= TAU {
            self.phase -= TAU;
        }
        out
    }
}
