use serde::{Deserialize, Serialize};

// both variants are capped at max_slew_per_sample
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Smoothing {
    Linear { max_slew_per_sample: f32 },
    Exponential { coefficient: f32, max_slew_per_sample: f32 },
}

impl Smoothing {
    pub fn max_slew_per_sample(&self) -> f32 {
        match *self {
            Smoothing::Linear { max_slew_per_sample } => max_slew_per_sample,
            Smoothing::Exponential { max_slew_per_sample, .. } => max_slew_per_sample,
        }
    }
}

impl Default for Smoothing {
    fn default() -> Self {
        Smoothing::Linear { max_slew_per_sample: 0.001 }
    }
}

#[derive(Clone, Debug)]
pub struct CvSmoother {
    value: f32,
    smoothing: Smoothing,
    min: f32,
    max: f32,
}

impl CvSmoother {
    pub fn new(initial: f32, smoothing: Smoothing, min: f32, max: f32) -> Self {
        Self {
            value: initial.clamp(min, max),
            smoothing,
            min,
            max,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    // one sample toward `target`; never overshoots, never leaves the range
    #[inline]
    pub fn advance(&mut self, target: f32) -> f32 {
        let target = target.clamp(self.min, self.max);
        let error = target - self.value;
        let step = match self.smoothing {
            Smoothing::Linear { .. } => error,
            Smoothing::Exponential { coefficient, .. } => error * coefficient,
        };
        let limit = self.smoothing.max_slew_per_sample();
        self.value = (self.value + step.clamp(-limit, limit)).clamp(self.min, self.max);
        self.value
    }
}
