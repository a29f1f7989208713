// Zero-crossing pitch tracker: period between rising crossings -> 1V/oct CV.
//
// A rising crossing needs the signal to have been at or below the arm level
// (-hysteresis when strict, 0 when relaxed) and then to reach +hysteresis,
// so noise around zero can't retrigger it. Silence never produces a crossing
// and the last target is held for as long as the input stays quiet.

use super::smoother::CvSmoother;
use crate::pipeline::config::{CrossingRule, CvConfig, TrackerConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Crossing {
    // first crossing since startup, nothing to measure against yet
    Reference,
    Accepted { period: u64 },
    Rejected { period: u64 },
}

#[derive(Clone, Debug)]
pub struct PitchTracker {
    sample_rate: f32,
    base_frequency: f32,
    hysteresis: f32,
    noise_floor: f32,
    arm_level: f32,
    min_period: u64,
    max_period: u64,
    cv_min: f32,
    cv_max: f32,

    previous_sample: f32,
    armed: bool,
    has_reference: bool,
    last_crossing: u64,
    samples_processed: u64,
    target_log_cv: f32,
    smoother: CvSmoother,
}

impl PitchTracker {
    pub fn new(sample_rate: f32, base_frequency: f32, tracker: &TrackerConfig, cv: &CvConfig) -> Self {
        let hysteresis = tracker.hysteresis.abs();
        let arm_level = match tracker.crossing_rule {
            CrossingRule::Strict => -hysteresis,
            CrossingRule::Relaxed => 0.0,
        };
        let min_period = (sample_rate / tracker.max_frequency).ceil().max(1.0) as u64;
        let max_period = ((sample_rate / tracker.min_frequency).floor() as u64).max(min_period);
        let initial = 0.0f32.clamp(cv.min_octaves, cv.max_octaves);

        Self {
            sample_rate,
            base_frequency,
            hysteresis,
            noise_floor: tracker.noise_floor.abs(),
            arm_level,
            min_period,
            max_period,
            cv_min: cv.min_octaves,
            cv_max: cv.max_octaves,
            previous_sample: 0.0,
            armed: false,
            has_reference: false,
            last_crossing: 0,
            samples_processed: 0,
            target_log_cv: initial,
            smoother: CvSmoother::new(initial, cv.smoothing, cv.min_octaves, cv.max_octaves),
        }
    }

    // the smoother advances every sample, crossing or not
    pub fn process(&mut self, sample: f32) -> Option<Crossing> {
        // NaN from a broken input reads as silence
        let sample = if sample.is_finite() { sample } else { 0.0 };
        let index = self.samples_processed;

        if self.previous_sample <= self.arm_level {
            self.armed = true;
        }

        let rising = self.armed && sample >= self.hysteresis && sample.abs() > self.noise_floor;
        let crossing = if rising {
            self.armed = false;
            Some(self.register_crossing(index))
        } else {
            None
        };

        self.previous_sample = sample;
        self.samples_processed = self.samples_processed.wrapping_add(1);
        self.smoother.advance(self.target_log_cv);
        crossing
    }

    fn register_crossing(&mut self, index: u64) -> Crossing {
        if !self.has_reference {
            self.has_reference = true;
            self.last_crossing = index;
            return Crossing::Reference;
        }

        let period = index.wrapping_sub(self.last_crossing);
        self.last_crossing = index;

        if period < self.min_period || period > self.max_period {
            return Crossing::Rejected { period };
        }

        let frequency = self.sample_rate / period as f32;
        self.target_log_cv = (frequency / self.base_frequency)
            .log2()
            .clamp(self.cv_min, self.cv_max);
        Crossing::Accepted { period }
    }

    #[cfg(test)]
    pub fn target_log_cv(&self) -> f32 {
        self.target_log_cv
    }

    pub fn smoothed_log_cv(&self) -> f32 {
        self.smoother.value()
    }

    #[cfg(test)]
    pub fn samples_processed(&self) -> u64 {
        self.samples_processed
    }

    #[cfg(test)]
    pub fn has_reference(&self) -> bool {
        self.has_reference
    }

    // frequency the current target stands for
    pub fn target_frequency(&self) -> f32 {
        self.base_frequency * self.target_log_cv.exp2()
    }

    #[cfg(test)]
    pub fn period_range(&self) -> (u64, u64) {
        (self.min_period, self.max_period)
    }
}
