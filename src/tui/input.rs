use std::time::Duration;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crate::shared::InputEvent;
use super::mode::TuiState;

const KNOB_STEP: f32 = 0.05;

// poll for input from the tui and resolve keys into front panel events
pub fn poll_input(timeout: Duration, ts: &mut TuiState) -> anyhow::Result<Vec<InputEvent>> {
    if !event::poll(timeout)? {
        return Ok(vec![]);
    }

    if let Event::Key(key) = event::read()? {
        if key.kind != KeyEventKind::Press {
            return Ok(vec![]);
        }
        return Ok(handle_key(key.code, ts));
    }
    Ok(vec![])
}

fn handle_key(code: KeyCode, ts: &mut TuiState) -> Vec<InputEvent> {
    match code {
        KeyCode::Esc => vec![InputEvent::Quit],

        // knob 1 = tempo, knob 2 = pitch
        KeyCode::Char('[') => vec![InputEvent::TempoKnob(-KNOB_STEP)],
        KeyCode::Char(']') => vec![InputEvent::TempoKnob(KNOB_STEP)],
        KeyCode::Char('-') => vec![InputEvent::PitchKnob(-KNOB_STEP)],
        KeyCode::Char('=') => vec![InputEvent::PitchKnob(KNOB_STEP)],

        // encoder: turn and press
        KeyCode::Char(',') => vec![InputEvent::EncoderTurn(-1)],
        KeyCode::Char('.') => vec![InputEvent::EncoderTurn(1)],
        KeyCode::Tab => vec![InputEvent::EncoderPress],

        KeyCode::Char(' ') => vec![InputEvent::ButtonPress],

        // local only, nothing for the engine
        KeyCode::Char('h') => {
            ts.show_help = !ts.show_help;
            vec![]
        }

        _ => vec![],
    }
}
