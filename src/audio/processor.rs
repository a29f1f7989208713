// The per-block core: controls once, then a strictly sequential sample loop.
// No allocation, no locking, no Results; bad numbers are clamped away.

use super::diagnostics::Diagnostics;
use super::frame::InputFrame;
use super::sink::OutputSink;
use crate::audio_api::EngineSnapshot;
use crate::dsp::{Oscillator, PitchTracker};
use crate::pipeline::config::{EngineConfig, GateSource};
use crate::sequencer::{ControlFrame, Sequencer};

const OSC_AMP: f32 = 0.95;

pub struct Processor {
    sample_duration: f64,
    audio_level: f32,
    gate_source: GateSource,
    cv_offset: f32,
    cv_low: f32,
    cv_high: f32,

    sequencer: Sequencer,
    tracker: PitchTracker,
    osc: Oscillator,
    diagnostics: Diagnostics,

    // last values written, for snapshots
    gate_out: bool,
    cv_out: f32,
    gate_in: bool,
}

impl Processor {
    pub fn new(config: &EngineConfig) -> Self {
        let sample_rate = config.sample_rate as f32;
        let cv = &config.cv;
        let cv_low = cv.offset_volts + cv.min_octaves;
        let cv_high = cv.offset_volts + cv.max_octaves;

        Self {
            sample_duration: config.sample_duration(),
            audio_level: config.output.audio_level,
            gate_source: config.output.gate_source,
            cv_offset: cv.offset_volts,
            cv_low,
            cv_high,
            sequencer: Sequencer::new(config),
            tracker: PitchTracker::new(sample_rate, config.base_frequency, &config.tracker, cv),
            osc: Oscillator::new(sample_rate, OSC_AMP),
            diagnostics: Diagnostics::default(),
            gate_out: false,
            cv_out: cv.offset_volts.clamp(cv_low, cv_high),
            gate_in: false,
        }
    }

    // one gate/cv/audio write per input frame, then the indicators once
    pub fn process_block<S: OutputSink>(&mut self, controls: &ControlFrame, input: &[InputFrame], sink: &mut S) {
        self.sequencer.apply_controls(controls);

        for (i, frame) in input.iter().enumerate() {
            if self.sequencer.advance_sample(self.sample_duration) {
                self.diagnostics.step_advances += 1;
            }

            // oscillator follows the playing step, silent on inactive steps
            self.osc.set_freq(self.sequencer.current_frequency());
            let tone = self.osc.process();
            let audio = if self.sequencer.current_step_active() {
                tone * self.audio_level
            } else {
                0.0
            };

            if let Some(crossing) = self.tracker.process(frame.audio) {
                self.diagnostics.record_crossing(crossing);
            }

            let gate = match self.gate_source {
                GateSource::Sequencer => self.sequencer.gate(),
                GateSource::Thru => frame.gate,
            };
            let cv = (self.cv_offset + self.tracker.smoothed_log_cv()).clamp(self.cv_low, self.cv_high);

            sink.set_gate(i, gate);
            sink.set_cv(i, cv);
            sink.set_audio(i, audio);

            self.gate_out = gate;
            self.cv_out = cv;
            self.gate_in = frame.gate;
        }

        self.diagnostics.record_block(input.len());
        sink.set_indicator(self.sequencer.indicators(self.gate_in));
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        let seq = &self.sequencer;
        EngineSnapshot {
            mode: seq.mode(),
            steps: *seq.steps(),
            current_step: seq.current_step(),
            edit_cursor: seq.edit_cursor(),
            tempo_bpm: seq.tempo_bpm(),
            gate: self.gate_out,
            cv_volts: self.cv_out,
            // 0 until a period has been measured
            tracked_hz: if self.diagnostics.accepted_periods > 0 {
                self.tracker.target_frequency()
            } else {
                0.0
            },
            indicators: seq.indicators(self.gate_in),
            diagnostics: self.diagnostics,
        }
    }

    #[cfg(test)]
    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    #[cfg(test)]
    pub fn tracker(&self) -> &PitchTracker {
        &self.tracker
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }
}
