use crate::audio_api::{AudioCommand, Diagnostics, EngineSnapshot};
use crate::core::{Knobs, event_to_audio};
use crate::shared::{DisplayState, InputEvent};

// UI-side owner of the panel state: turns key events into audio commands
// and keeps the last thing the engine told us.
pub struct Middle {
    knobs: Knobs,
    latest: EngineSnapshot,
}

impl Middle {
    pub fn new(initial: EngineSnapshot) -> Self {
        Self {
            knobs: Knobs::default(),
            latest: initial,
        }
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Vec<AudioCommand> {
        event_to_audio(&event, &mut self.knobs).into_iter().collect()
    }

    pub fn on_snapshot(&mut self, snapshot: EngineSnapshot) {
        self.latest = snapshot;
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.latest.diagnostics
    }

    pub fn display_state(&self) -> DisplayState {
        let s = &self.latest;
        DisplayState {
            mode: s.mode,
            steps: s.steps,
            current_step: s.current_step,
            edit_cursor: s.edit_cursor,
            tempo_bpm: s.tempo_bpm,
            gate: s.gate,
            cv_volts: s.cv_volts,
            tracked_hz: s.tracked_hz,
            indicators: s.indicators,
            tempo_knob: self.knobs.tempo,
            pitch_knob: self.knobs.pitch,
            overruns: s.diagnostics.deadline_overruns,
            starved: s.diagnostics.starved_input_samples,
        }
    }
}
