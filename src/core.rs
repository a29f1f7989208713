use crate::audio_api::AudioCommand;
use crate::shared::InputEvent;

// Absolute knob positions as the UI remembers them; the panel only ever
// sends relative turns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Knobs {
    pub tempo: f32,
    pub pitch: f32,
}

impl Default for Knobs {
    fn default() -> Self {
        Self { tempo: 0.5, pitch: 0.5 }
    }
}

fn nudge(knob: &mut f32, delta: f32) -> f32 {
    if delta.is_finite() {
        *knob = (*knob + delta).clamp(0.0, 1.0);
    }
    *knob
}

pub fn event_to_audio(event: &InputEvent, knobs: &mut Knobs) -> Option<AudioCommand> {
    match *event {
        InputEvent::TempoKnob(delta) => Some(AudioCommand::SetTempoKnob(nudge(&mut knobs.tempo, delta))),
        InputEvent::PitchKnob(delta) => Some(AudioCommand::SetPitchKnob(nudge(&mut knobs.pitch, delta))),
        InputEvent::EncoderTurn(0) => None,
        InputEvent::EncoderTurn(delta) => Some(AudioCommand::Encoder(delta)),
        InputEvent::EncoderPress => Some(AudioCommand::ToggleMode),
        InputEvent::ButtonPress => Some(AudioCommand::ToggleStep),
        InputEvent::Quit => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knob_turns_become_absolute_positions() {
        let mut knobs = Knobs::default();
        assert_eq!(
            event_to_audio(&InputEvent::TempoKnob(0.25), &mut knobs),
            Some(AudioCommand::SetTempoKnob(0.75))
        );
        assert_eq!(
            event_to_audio(&InputEvent::PitchKnob(-0.75), &mut knobs),
            Some(AudioCommand::SetPitchKnob(0.0))
        );
        assert_eq!(knobs, Knobs { tempo: 0.75, pitch: 0.0 });
    }

    #[test]
    fn knobs_stop_at_the_ends() {
        let mut knobs = Knobs::default();
        for _ in 0..30 {
            event_to_audio(&InputEvent::TempoKnob(0.05), &mut knobs);
        }
        assert_eq!(knobs.tempo, 1.0);
        event_to_audio(&InputEvent::TempoKnob(f32::NAN), &mut knobs);
        assert_eq!(knobs.tempo, 1.0);
    }

    #[test]
    fn buttons_and_encoder() {
        let mut knobs = Knobs::default();
        assert_eq!(event_to_audio(&InputEvent::EncoderTurn(-1), &mut knobs), Some(AudioCommand::Encoder(-1)));
        assert_eq!(event_to_audio(&InputEvent::EncoderTurn(0), &mut knobs), None);
        assert_eq!(event_to_audio(&InputEvent::EncoderPress, &mut knobs), Some(AudioCommand::ToggleMode));
        assert_eq!(event_to_audio(&InputEvent::ButtonPress, &mut knobs), Some(AudioCommand::ToggleStep));
        assert_eq!(event_to_audio(&InputEvent::Quit, &mut knobs), None);
    }
}
