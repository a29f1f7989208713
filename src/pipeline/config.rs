// Every fixed constant of the engine, in one place. Loaded once at startup
// (see persistence.rs); nothing here is renegotiated while running.

use serde::{Deserialize, Serialize};

use crate::dsp::{MAX_INTERVAL, Smoothing};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub sample_rate: u32,
    pub block_size: u32,
    pub base_frequency: f32,
    pub min_tempo: f32,
    pub max_tempo: f32,
    pub steps_per_beat: f32, // 2.0 = eighth notes
    pub max_interval: i32, // pitch knob spans -max..=+max scale degrees
    pub tracker: TrackerConfig,
    pub cv: CvConfig,
    pub output: OutputConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            block_size: 48,
            base_frequency: 440.0,
            min_tempo: 40.0,
            max_tempo: 400.0,
            steps_per_beat: 2.0,
            max_interval: MAX_INTERVAL,
            tracker: TrackerConfig::default(),
            cv: CvConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossingRule {
    Strict,  // arm at -hysteresis
    Relaxed, // arm at 0
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub hysteresis: f32,
    pub noise_floor: f32,
    pub crossing_rule: CrossingRule,
    pub min_frequency: f32,
    pub max_frequency: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            hysteresis: 0.01,
            noise_floor: 0.001,
            crossing_rule: CrossingRule::Strict,
            min_frequency: 20.0,
            max_frequency: 20_000.0,
        }
    }
}

// CV is in octaves relative to the base frequency, 1V/oct
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvConfig {
    pub min_octaves: f32,
    pub max_octaves: f32,
    pub offset_volts: f32,
    pub smoothing: Smoothing,
}

impl Default for CvConfig {
    fn default() -> Self {
        Self {
            min_octaves: -5.0,
            max_octaves: 5.0,
            offset_volts: 0.0,
            smoothing: Smoothing::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateSource {
    Sequencer,
    Thru, // gate-in passes straight to gate-out
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub gate_high: f32,
    pub gate_low: f32,
    pub audio_level: f32,
    pub gate_source: GateSource,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            gate_high: 5.0,
            gate_low: 0.0,
            audio_level: 0.9,
            gate_source: GateSource::Sequencer,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.sample_rate > 0, "sample_rate must be positive");
        anyhow::ensure!(self.block_size > 0, "block_size must be positive");
        anyhow::ensure!(
            self.base_frequency.is_finite() && self.base_frequency > 0.0,
            "base_frequency must be positive, got {}",
            self.base_frequency
        );
        anyhow::ensure!(
            self.min_tempo > 0.0 && self.min_tempo <= self.max_tempo,
            "tempo range {}..{} is invalid",
            self.min_tempo,
            self.max_tempo
        );
        anyhow::ensure!(
            self.steps_per_beat.is_finite() && self.steps_per_beat > 0.0,
            "steps_per_beat must be positive"
        );
        anyhow::ensure!(
            (0..=MAX_INTERVAL).contains(&self.max_interval),
            "max_interval must be within 0..={}",
            MAX_INTERVAL
        );

        let t = &self.tracker;
        anyhow::ensure!((0.0..1.0).contains(&t.hysteresis), "hysteresis must be in [0, 1)");
        anyhow::ensure!((0.0..1.0).contains(&t.noise_floor), "noise_floor must be in [0, 1)");
        anyhow::ensure!(
            t.min_frequency > 0.0 && t.min_frequency < t.max_frequency,
            "tracker frequency range {}..{} is invalid",
            t.min_frequency,
            t.max_frequency
        );

        let cv = &self.cv;
        anyhow::ensure!(
            cv.min_octaves <= 0.0 && 0.0 <= cv.max_octaves,
            "cv range {}..{} must contain 0",
            cv.min_octaves,
            cv.max_octaves
        );
        anyhow::ensure!(cv.offset_volts.is_finite(), "offset_volts must be finite");
        anyhow::ensure!(
            cv.smoothing.max_slew_per_sample() > 0.0,
            "max_slew_per_sample must be positive"
        );
        if let Smoothing::Exponential { coefficient, .. } = cv.smoothing {
            anyhow::ensure!(
                coefficient > 0.0 && coefficient <= 1.0,
                "smoothing coefficient must be in (0, 1], got {}",
                coefficient
            );
        }

        let out = &self.output;
        anyhow::ensure!(
            out.gate_high.is_finite() && out.gate_low.is_finite(),
            "gate levels must be finite"
        );
        anyhow::ensure!((0.0..=1.0).contains(&out.audio_level), "audio_level must be in [0, 1]");
        Ok(())
    }

    pub fn sample_duration(&self) -> f64 {
        1.0 / self.sample_rate as f64
    }
}
